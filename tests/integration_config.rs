use std::fs;
use std::path::Path;

use mockshift::*;

#[test]
fn reads_transform_section_from_toml() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("mockshift.toml");
    fs::write(
        &path,
        "[transform]\nparser = \"ts\"\nquote = \"double\"\nskip_import_detection = true\nextensions = [\"js\", \"ts\"]\n",
    )
    .unwrap();

    let loaded = load_config(Some(&path)).expect("load");
    assert_eq!(loaded.cfg.parser, Some(ParserKind::Ts));
    assert_eq!(loaded.cfg.quote, Some(QuoteStyle::Double));
    assert_eq!(loaded.cfg.skip_import_detection, Some(true));
    assert_eq!(loaded.cfg.extensions, Some(vec!["js".to_string(), "ts".to_string()]));
    assert_eq!(loaded.cfg.ignore, None);
}

#[test]
fn reads_json_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("mockshift.json");
    fs::write(&path, r#"{ "transform": { "parser": "flow", "ignore": ["**/fixtures/**"] } }"#).unwrap();

    let loaded = load_config(Some(&path)).expect("load");
    assert_eq!(loaded.cfg.parser, Some(ParserKind::Flow));
    assert_eq!(loaded.cfg.ignore, Some(vec!["**/fixtures/**".to_string()]));
}

#[test]
fn unknown_parser_in_config_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("mockshift.toml");
    fs::write(&path, "[transform]\nparser = \"coffee\"\n").unwrap();
    let err = load_config(Some(&path)).err().expect("error");
    assert!(format!("{:#}", err).contains("failed to parse config"), "{:#}", err);
}

#[test]
fn parser_names_and_extensions() {
    assert_eq!("typescript".parse::<ParserKind>().unwrap(), ParserKind::Ts);
    assert_eq!("Babylon".parse::<ParserKind>().unwrap(), ParserKind::Babylon);
    assert!(matches!(
        "coffee".parse::<ParserKind>(),
        Err(TransformError::UnknownParser(name)) if name == "coffee"
    ));
    assert_eq!(ParserKind::for_path(Path::new("a/b.test.ts")), ParserKind::Ts);
    assert_eq!(ParserKind::for_path(Path::new("a/b.tsx")), ParserKind::Tsx);
    assert_eq!(ParserKind::for_path(Path::new("a/b.mjs")), ParserKind::Babel);
}
