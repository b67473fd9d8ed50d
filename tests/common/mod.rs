#![allow(dead_code)]

use std::path::PathBuf;

use mockshift::*;

pub fn manifest_path(rel: &str) -> String {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    root.join(rel).to_string_lossy().into_owned()
}

pub fn fixture(rel: &str) -> String {
    let path = manifest_path(&format!("tests/fixtures/{}", rel));
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {}", path, e))
}

pub fn run_with(source: &str, options: &TransformOptions) -> TransformOutput {
    transform(source, options).expect("transform")
}

pub fn run(source: &str) -> TransformOutput {
    run_with(source, &TransformOptions::default())
}

/// Transformed text; panics on the skip sentinel.
pub fn code(source: &str) -> String {
    match run(source).result {
        Transformed::Code(code) => code,
        Transformed::Skipped => panic!("unexpected skip"),
    }
}

pub fn messages(out: &TransformOutput) -> Vec<String> {
    out.diagnostics.iter().map(|d| d.message()).collect()
}

pub fn parse_js(source: &str) -> SyntaxTree {
    parse(source, ParserKind::Babel).expect("parse")
}
