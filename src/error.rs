use thiserror::Error;

use crate::options::ParserKind;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("syntax error at line {line}, column {column} (parser: {parser})")]
    Parse {
        parser: ParserKind,
        line: usize,
        column: usize,
    },
    #[error("unknown parser '{0}' (expected babel, babylon, flow, ts or tsx)")]
    UnknownParser(String),
    #[error("failed to load the {parser} grammar")]
    Language {
        parser: ParserKind,
        #[source]
        source: tree_sitter::LanguageError,
    },
    #[error("{0} parser returned no tree")]
    Aborted(ParserKind),
}
