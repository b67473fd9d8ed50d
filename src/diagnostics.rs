use std::fmt;

use crate::syntax::{NodeId, Position, SyntaxTree};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    UnsupportedRegistration,
    UnresolvablePath,
    LeftoverMethod(String),
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::UnsupportedRegistration => f.write_str(
                "Unsupported mockery registerMock found (should have 2 args, first being string literal)",
            ),
            DiagnosticKind::UnresolvablePath => f.write_str(
                "Cannot resolve mockery mock path because test subject module path could not be found",
            ),
            DiagnosticKind::LeftoverMethod(method) => {
                write!(f, "Unsupported mockery method {method}() left in place")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub node: NodeId,
    pub position: Position,
}

impl Diagnostic {
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.position.line, self.kind)
    }
}

/// Ordered record of rewrites that were refused.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn emit(&mut self, tree: &SyntaxTree, kind: DiagnosticKind, node: NodeId) {
        tracing::trace!(line = tree.position(node).line, "{kind}");
        self.items.push(Diagnostic {
            kind,
            node,
            position: tree.position(node),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
