mod config;
mod diagnostics;
mod error;
mod files;
mod finalize;
mod imports;
mod options;
mod parse;
mod resolve;
mod rewrite;
mod scan;
mod syntax;
mod transform;

pub use config::{load_config, LoadedConfig, TransformConfig};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::TransformError;
pub use files::{collect_inputs, DEFAULT_EXTENSIONS, DEFAULT_IGNORE};
pub use finalize::{finalize, js_quote};
pub use imports::remove_import;
pub use options::{ApiNames, ParserKind, QuoteStyle, TransformOptions};
pub use parse::parse;
pub use resolve::{dirname, is_relative, normalize, rebase, MockPathResolver};
pub use rewrite::{factory, method_call, remove_call, remove_declarator};
pub use scan::{find, Arity, CallShape, Callee, MockRegistration, ModuleLoadCall, Property, ScopeConstraint};
pub use syntax::{Built, Edit, Node, NodeId, NodeKind, Position, Scope, ScopeId, StrLit, SyntaxTree};
pub use transform::{
    discover_loads, remove_lifecycle_calls, report_leftovers, rewrite_loads, rewrite_registrations, transform,
    TransformOutput, Transformed,
};
