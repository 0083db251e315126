// Author: Dustin Pilgrim
// License: MIT

#[cfg(test)]
use super::*;
use crate::parser::parse_document;

fn sample() -> Document {
    let input = r#"
name = "demo"
debug = true

[server]
host = "localhost"
port = 8080
timeout = 2.5
max-connections = 500
limits = [{max: 10, burst: 20}]
tags = ["a", "b"]
mode = "Rounded"
"#;
    parse_document(input, None).expect("Failed to parse sample")
}

#[test]
fn test_get_typed_values() {
    let doc = sample();

    let name: String = doc.get("name").expect("Failed to get name");
    assert_eq!(name, "demo");

    let debug: bool = doc.get("debug").unwrap();
    assert!(debug);

    let host: String = doc.get("server.host").unwrap();
    assert_eq!(host, "localhost");

    let port: u16 = doc.get("server.port").unwrap();
    assert_eq!(port, 8080);

    let timeout: f64 = doc.get("server.timeout").unwrap();
    assert_eq!(timeout, 2.5);

    let port_as_float: f64 = doc.get("server.port").unwrap();
    assert_eq!(port_as_float, 8080.0);

    let tags: Vec<String> = doc.get("server.tags").unwrap();
    assert_eq!(tags, vec!["a", "b"]);
}

#[test]
fn test_nested_object_paths() {
    let mut doc = sample();
    let mut env = IndexMap::new();
    env.insert("region".to_string(), Value::String("eu".into()));
    env.insert("zone".to_string(), Value::Int(3));
    doc.sections["server"].insert("env".to_string(), Value::Object(env));

    let region: String = doc.get("server.env.region").unwrap();
    assert_eq!(region, "eu");

    let env = doc.get_value("server.env").unwrap().as_object().expect("Expected object");
    assert_eq!(env.keys().collect::<Vec<_>>(), vec!["region", "zone"]);

    let limits: Vec<IndexMap<String, u32>> = doc.get("server.limits").unwrap();
    assert_eq!(limits[0].get("burst"), Some(&20));

    assert!(!doc.has("server.host.deeper"));
}

#[test]
fn test_snake_and_kebab_keys() {
    let doc = sample();

    let max: usize = doc.get("server.max_connections").unwrap();
    assert_eq!(max, 500);
    assert!(doc.has("server.max-connections"));
}

#[test]
fn test_missing_paths() {
    let doc = sample();

    let err = doc.get::<String>("server.nope").unwrap_err();
    assert_eq!(err.code(), Some(304));

    assert_eq!(doc.get_optional::<String>("server.nope").unwrap(), None);
    assert_eq!(doc.get_optional::<i64>("server.port").unwrap(), Some(8080));
    assert_eq!(doc.get_or("server.retries", 3u32), 3);
    assert!(!doc.has("missing.section"));
}

#[test]
fn test_type_mismatch_errors() {
    let doc = sample();

    let err = doc.get::<i64>("server.host").unwrap_err();
    assert!(matches!(err, MangoError::TypeError { code: Some(403), .. }));
    assert!(err.message().contains("server.host"));

    // wrong type is an error, not a missing value
    assert!(doc.get_optional::<bool>("server.port").is_err());
}

#[test]
fn test_integer_range_checks() {
    let doc = parse_document("big = 70000\n", None).unwrap();

    let err = doc.get::<u16>("big").unwrap_err();
    assert_eq!(err.code(), Some(407));

    let ok: u32 = doc.get("big").unwrap();
    assert_eq!(ok, 70000);
}

#[test]
fn test_bool_typo_hint() {
    let doc = parse_document("flag = ture\nother = flase\nshort = tru\nword = maybe\n", None).unwrap();

    for key in ["flag", "other", "short"] {
        let err = doc.get::<bool>(key).unwrap_err();
        assert_eq!(err.code(), Some(404));
        assert!(err.message().contains("Did you mean"), "no hint for {}", key);
    }

    let err = doc.get::<bool>("word").unwrap_err();
    assert_eq!(err.code(), Some(404));
    assert!(!err.message().contains("Did you mean"));
}

#[test]
fn test_keys_in_file_order() {
    let doc = sample();

    assert_eq!(doc.keys("global").unwrap(), vec!["name", "debug"]);
    assert_eq!(doc.keys("server").unwrap()[..2], ["host".to_string(), "port".to_string()]);

    let err = doc.keys("absent").unwrap_err();
    assert_eq!(err.code(), Some(306));
}

#[test]
fn test_string_enum_validation() {
    let doc = sample();

    let mode = doc.get_string_enum("server.mode", &["plain", "rounded", "thick"]);
    assert_eq!(mode.unwrap(), "Rounded");

    let err = doc.get_string_enum("server.mode", &["good", "better"]).unwrap_err();
    assert_eq!(err.code(), Some(451));
}

#[test]
fn test_get_validated() {
    let doc = sample();

    let port = doc.get_validated::<u16, _>("server.port", |p| *p > 1024, "a port above 1024").unwrap();
    assert_eq!(port, 8080);

    let err = doc
        .get_validated::<u16, _>("server.port", |p| *p < 1024, "a privileged port")
        .unwrap_err();
    assert_eq!(err.code(), Some(450));
}
