use std::fmt;
use std::path::Path;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Deserialize;

use crate::error::TransformError;

/// Parse front-end, named after the jscodeshift parser option.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    #[default]
    Babel,
    Babylon,
    Flow,
    Ts,
    Tsx,
}

impl ParserKind {
    /// Picks a front-end from a file extension; anything that is not
    /// TypeScript goes through the JavaScript grammar.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ts") | Some("mts") | Some("cts") => ParserKind::Ts,
            Some("tsx") => ParserKind::Tsx,
            _ => ParserKind::Babel,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ParserKind::Babel => "babel",
            ParserKind::Babylon => "babylon",
            ParserKind::Flow => "flow",
            ParserKind::Ts => "ts",
            ParserKind::Tsx => "tsx",
        }
    }
}

impl fmt::Display for ParserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParserKind {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "babel" => Ok(ParserKind::Babel),
            "babylon" => Ok(ParserKind::Babylon),
            "flow" => Ok(ParserKind::Flow),
            "ts" | "typescript" => Ok(ParserKind::Ts),
            "tsx" => Ok(ParserKind::Tsx),
            other => Err(TransformError::UnknownParser(other.to_string())),
        }
    }
}

/// Quote character for string literals the rewrite creates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    /// Reuse the quote of the literal being replaced.
    #[default]
    Auto,
    Single,
    Double,
}

impl QuoteStyle {
    pub fn pick(self, original: char) -> char {
        match self {
            QuoteStyle::Auto => original,
            QuoteStyle::Single => '\'',
            QuoteStyle::Double => '"',
        }
    }
}

/// Names on both sides of the migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiNames {
    pub legacy_package: String,
    pub legacy_register: String,
    pub legacy_lifecycle: Vec<String>,
    pub loader: String,
    pub target_binding: String,
    pub target_mock: String,
    pub target_require_actual: String,
}

impl Default for ApiNames {
    fn default() -> Self {
        Self {
            legacy_package: "mockery".to_string(),
            legacy_register: "registerMock".to_string(),
            legacy_lifecycle: vec![
                "enable".to_string(),
                "disable".to_string(),
                "deregisterAll".to_string(),
            ],
            loader: "require".to_string(),
            target_binding: "jest".to_string(),
            target_mock: "mock".to_string(),
            target_require_actual: "requireActual".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    /// When the legacy import is absent, report [`crate::Transformed::Skipped`]
    /// instead of handing the source back unchanged.
    pub skip_import_detection: bool,
    pub parser: ParserKind,
    pub quote: QuoteStyle,
    pub api: ApiNames,
}

impl TransformOptions {
    pub fn with_parser(mut self, parser: ParserKind) -> Self {
        self.parser = parser;
        self
    }
}
