//! Column type mapping.
//!
//! A column's raw SQL type plus its optional `--` annotation resolve to a
//! [`FieldType`]:
//!
//! | raw type | annotation  | field type                    |
//! |----------|-------------|-------------------------------|
//! | `text`   | `datetime`  | [`FieldType::Timestamp`]      |
//! | `text`   | anything    | [`FieldType::String`]         |
//! | `json`   | anything    | [`FieldType::Embedded`]       |
//! | `number` | anything    | [`FieldType::Float64`]        |
//!
//! JSON columns may carry the body of their structured type in the
//! annotation (`meta json -- { W float64 }`). Whether an annotation counts
//! as such a body is decided by a [`SubtypeExtractor`].

use tracing::warn;

use crate::error::UnsupportedType;
use crate::schema::{FieldType, Subtype};

/// Decides whether a JSON column annotation declares an embedded type body.
pub trait SubtypeExtractor {
    /// Returns the sub-type body for the given annotation, if it declares one.
    fn extract<'a>(&self, comment: &'a str) -> Option<&'a str>;
}

/// Accepts any annotation starting with `{`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BraceExtractor;

impl SubtypeExtractor for BraceExtractor {
    fn extract<'a>(&self, comment: &'a str) -> Option<&'a str> {
        comment.trim_start().starts_with('{').then_some(comment)
    }
}

/// Accepts only annotations that parse as a JSON object.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonObjectExtractor;

impl SubtypeExtractor for JsonObjectExtractor {
    fn extract<'a>(&self, comment: &'a str) -> Option<&'a str> {
        serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(comment)
            .is_ok()
            .then_some(comment)
    }
}

/// Result of resolving a column type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedType {
    /// The resolved field type.
    pub field_type: FieldType,
    /// Embedded type declared by the column annotation, if any.
    pub subtype: Option<Subtype>,
}

impl MappedType {
    const fn plain(field_type: FieldType) -> Self {
        Self {
            field_type,
            subtype: None,
        }
    }
}

/// Resolves raw column types into field types.
#[derive(Debug, Clone, Default)]
pub struct TypeMapper<E = BraceExtractor> {
    extractor: E,
}

impl TypeMapper {
    /// Creates a type mapper using [`BraceExtractor`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: SubtypeExtractor> TypeMapper<E> {
    /// Creates a type mapper with a custom sub-type extractor.
    #[must_use]
    pub const fn with_extractor(extractor: E) -> Self {
        Self { extractor }
    }

    /// Resolves the type of one column.
    ///
    /// `table_name` and `column_name` are the already normalized names; they
    /// make up the name of embedded JSON types.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedType`] for any raw type other than `text`,
    /// `json` and `number`.
    pub fn map(
        &self,
        table_name: &str,
        column_name: &str,
        raw_type: &str,
        comment: Option<&str>,
    ) -> Result<MappedType, UnsupportedType> {
        let sql_type = raw_type.trim().to_lowercase();
        let meta = comment.unwrap_or_default().trim().to_lowercase();

        match sql_type.as_str() {
            "text" if meta == "datetime" => Ok(MappedType::plain(FieldType::Timestamp)),
            "text" => Ok(MappedType::plain(FieldType::String)),
            "json" => {
                let name = format!("{table_name}_{column_name}");
                let subtype = comment
                    .and_then(|c| self.extractor.extract(c))
                    .map(|body| Subtype {
                        name: name.clone(),
                        body: body.to_string(),
                    });
                if subtype.is_none() {
                    warn!(
                        subtype = %name,
                        "JSON column has no embedded type body; the generated type is left undeclared"
                    );
                }
                Ok(MappedType {
                    field_type: FieldType::Embedded(name),
                    subtype,
                })
            }
            "number" => Ok(MappedType::plain(FieldType::Float64)),
            _ => Err(UnsupportedType {
                raw_type: raw_type.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(raw_type: &str, comment: Option<&str>) -> Result<MappedType, UnsupportedType> {
        TypeMapper::new().map("Photo", "Meta", raw_type, comment)
    }

    #[test]
    fn test_text_columns() {
        assert_eq!(map("text", None).unwrap().field_type, FieldType::String);
        assert_eq!(
            map("text", Some("datetime")).unwrap().field_type,
            FieldType::Timestamp
        );
        assert_eq!(
            map(" TEXT ", Some("  DateTime ")).unwrap().field_type,
            FieldType::Timestamp
        );
        assert_eq!(
            map("text", Some("datetime please")).unwrap().field_type,
            FieldType::String
        );
    }

    #[test]
    fn test_number_columns() {
        let mapped = map("number", None).unwrap();
        assert_eq!(mapped.field_type, FieldType::Float64);
        assert!(mapped.subtype.is_none());
    }

    #[test]
    fn test_json_column_registers_subtype() {
        let mapped = map("json", Some(r#"{"w":0}"#)).unwrap();
        assert_eq!(mapped.field_type, FieldType::Embedded("Photo_Meta".into()));
        assert_eq!(
            mapped.subtype,
            Some(Subtype {
                name: "Photo_Meta".into(),
                body: r#"{"w":0}"#.into(),
            })
        );
    }

    #[test]
    fn test_json_body_is_not_normalized() {
        let mapped = map("JSON", Some("{ Width float64 }")).unwrap();
        assert_eq!(mapped.subtype.unwrap().body, "{ Width float64 }");
    }

    #[test]
    fn test_json_column_without_body() {
        let mapped = map("json", None).unwrap();
        assert_eq!(mapped.field_type, FieldType::Embedded("Photo_Meta".into()));
        assert!(mapped.subtype.is_none());

        let mapped = map("json", Some("free-form blob")).unwrap();
        assert!(mapped.subtype.is_none());
    }

    #[test]
    fn test_unsupported_type() {
        let err = map("blob", None).unwrap_err();
        assert_eq!(err.raw_type, "blob");
        assert!(map("integer", None).is_err());
    }

    #[test]
    fn test_json_object_extractor() {
        let mapper = TypeMapper::with_extractor(JsonObjectExtractor);

        let mapped = mapper
            .map("Photo", "Meta", "json", Some(r#"{"w": 0, "h": 0}"#))
            .unwrap();
        assert!(mapped.subtype.is_some());

        let mapped = mapper
            .map("Photo", "Meta", "json", Some("{ W float64 }"))
            .unwrap();
        assert!(mapped.subtype.is_none());
    }

    #[test]
    fn test_brace_extractor() {
        assert_eq!(BraceExtractor.extract("{ W float64 }"), Some("{ W float64 }"));
        assert_eq!(BraceExtractor.extract("datetime"), None);
    }
}
