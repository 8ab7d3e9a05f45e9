//! End-to-end generation from a schema dump.

use poorman::prelude::*;

const SCHEMA: &str = "CREATE TABLE users (\n\
                      \x20 id text primary key,\n\
                      \x20 username text not null unique,\n\
                      \x20 password text not null,\n\
                      \x20 created_at text not null, -- datetime\n\
                      \x20 modified_at text not null -- datetime\n\
                      );\n\
                      CREATE TABLE uploads (\n\
                      \x20 id text primary key,\n\
                      \x20 title text,\n\
                      \x20 metadata json, -- { Iso string; Camera string }\n\
                      \x20 created_at text not null -- datetime\n\
                      );\n\
                      CREATE INDEX uploads_created_at ON uploads (created_at);\n";

#[tokio::test]
async fn generates_one_go_file_per_table() {
    let dir = tempfile::tempdir().unwrap();
    let dump = dir.path().join("schema.sql");
    std::fs::write(&dump, SCHEMA).unwrap();
    let out_dir = dir.path().join("data");

    let text = SchemaSource::DumpFile { path: dump }.load().await.unwrap();
    let schema = SchemaParser::new().parse(&text).unwrap();
    let config = GenerateConfig {
        out_dir: out_dir.clone(),
        ..GenerateConfig::default()
    };
    let report = Generator::new(MiniJinjaRenderer::new(), FsWriter, config)
        .generate(&schema)
        .unwrap();

    assert_eq!(report.files.len(), 2);

    let user = std::fs::read_to_string(out_dir.join("user.go")).unwrap();
    assert!(user.contains(
        "type User struct {\n\
         \tId string\n\
         \tUsername string\n\
         \tPassword string\n\
         \tCreatedAt time.Time\n\
         \tModifiedAt time.Time\n\
         }\n"
    ));
    assert!(user.contains(
        "INSERT INTO users (id, username, password, created_at, modified_at) VALUES (?, ?, ?, ?, ?);"
    ));

    let upload = std::fs::read_to_string(out_dir.join("upload.go")).unwrap();
    assert!(upload.contains("type Upload_Metadata struct { Iso string; Camera string }\n"));
    assert!(upload.contains("\tMetadata Upload_Metadata\n"));
    assert!(upload.contains("encMetadata, err := json.Marshal(row.Metadata)"));
}

#[tokio::test]
async fn unsupported_type_generates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let dump = dir.path().join("schema.sql");
    std::fs::write(
        &dump,
        "CREATE TABLE users (\n  id text\n);\nCREATE TABLE files (\n  data blob\n);\n",
    )
    .unwrap();

    let text = SchemaSource::DumpFile { path: dump }.load().await.unwrap();
    let err: GenerateError = SchemaParser::new().parse(&text).unwrap_err().into();
    assert_eq!(
        err.to_string(),
        "Schema error: Line 5: column 'files.data' has unsupported type 'blob'"
    );
}

#[test]
fn inspect_output_is_stable_json() {
    let schema = SchemaParser::new()
        .parse("CREATE TABLE tags (\n  label text -- shown in lists\n);")
        .unwrap();
    let json = serde_json::to_value(&schema).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "tables": [{
                "sql_name": "tags",
                "name": "Tag",
                "columns": [{
                    "sql_name": "label",
                    "name": "Label",
                    "raw_type": "text",
                    "attrs": "",
                    "comment": "shown in lists",
                    "mapped_type": {"kind": "string"},
                    "subtype": null
                }]
            }]
        })
    );
}
