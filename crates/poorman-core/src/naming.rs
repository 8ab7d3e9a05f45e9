//! Identifier normalization.
//!
//! SQL identifiers are `snake_case` and usually plural (`user_accounts`).
//! Generated type and field names are upper camel case and singular
//! (`UserAccount`).

/// Converts a `snake_case` identifier into upper camel case.
///
/// The first character of every underscore-separated word is upper-cased;
/// the rest of each word keeps its original casing, so `user_ID` becomes
/// `UserID`.
#[must_use]
pub fn camelize(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;
    for ch in s.chars() {
        if ch == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.extend(ch.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(ch);
        }
    }
    result
}

/// Drops a single trailing `s`.
///
/// Irregular plurals are not handled: `children` stays `children` and
/// `status` becomes `statu`.
#[must_use]
pub fn singularize(s: &str) -> &str {
    s.strip_suffix('s').unwrap_or(s)
}

/// Derives a generated type or field name from a SQL identifier.
#[must_use]
pub fn type_name(sql_name: &str) -> String {
    singularize(&camelize(sql_name)).to_string()
}
