use tracing::trace;

use crate::rewrite::remove_declarator;
use crate::scan::ModuleLoadCall;
use crate::syntax::{NodeId, NodeKind, SyntaxTree};

/// Strips every `require`/`import` of `package` and returns the local name the
/// first one was bound to.
pub fn remove_import(tree: &mut SyntaxTree, package: &str, loader: &str) -> Option<String> {
    let mut binding = None;
    let ids: Vec<NodeId> = tree.ids().collect();
    for id in ids {
        if !tree.is_live(id) {
            continue;
        }
        match tree.kind(id).clone() {
            NodeKind::Import { source, local } if source.as_deref() == Some(package) => {
                trace!(line = tree.position(id).line, "removing import of {package}");
                tree.remove(id);
                binding = binding.or(local);
            }
            NodeKind::VarDeclarator {
                name: Some(name),
                init: Some(init),
            } if loads(tree, init, package, loader) => {
                if remove_declarator(tree, id) {
                    trace!(line = tree.position(id).line, "removing require of {package}");
                }
                binding = binding.or(Some(name));
            }
            NodeKind::ExprStatement {
                expr: Some(expr),
                in_list: true,
            } if loads(tree, expr, package, loader) => {
                tree.remove(id);
            }
            _ => {}
        }
    }
    binding
}

fn loads(tree: &SyntaxTree, id: NodeId, package: &str, loader: &str) -> bool {
    ModuleLoadCall::classify(tree, id, loader).is_some_and(|load| load.path == package)
}
