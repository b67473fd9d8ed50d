use crate::syntax::{Built, NodeId, NodeKind, StrLit, SyntaxTree};

/// `<object>.<property>(<args>)`
pub fn method_call(object: &str, property: &str, args: Vec<Built>) -> Built {
    Built::Call {
        callee: Box::new(Built::Member {
            object: Box::new(Built::Ident(object.to_string())),
            property: property.to_string(),
        }),
        args,
    }
}

/// `() => <value>`, wrapping the original expression node.
pub fn factory(value: NodeId) -> Built {
    Built::Factory(Box::new(Built::Node(value)))
}

pub fn string(value: String, quote: char) -> Built {
    Built::Str(StrLit { value, quote })
}

/// Takes a call out of the program while keeping the surrounding syntax
/// valid: whole statements go away, other positions get a neutral stand-in.
pub fn remove_call(tree: &mut SyntaxTree, call: NodeId) {
    let Some(parent) = tree.parent(call) else {
        return;
    };
    let kind = tree.kind(parent).clone();
    match kind {
        NodeKind::ExprStatement {
            expr: Some(expr),
            in_list,
        } if expr == call => {
            if in_list {
                tree.remove(parent);
            } else {
                tree.replace(parent, Built::EmptyBlock);
            }
        }
        NodeKind::Function {
            arrow: true,
            expr_body: Some(body),
        } if body == call => tree.replace(call, Built::EmptyBlock),
        _ => tree.replace(call, Built::Ident("undefined".to_string())),
    }
}

/// Removes a declarator, or its whole declaration when it is the only one.
/// Returns false when neither can be removed without breaking the syntax
/// (a lone declarator in a `for` head).
pub fn remove_declarator(tree: &mut SyntaxTree, declarator: NodeId) -> bool {
    let Some(decl) = tree.parent(declarator) else {
        return false;
    };
    let NodeKind::VarDecl {
        declarators,
        in_list,
    } = tree.kind(decl)
    else {
        return false;
    };
    let live = declarators
        .iter()
        .filter(|&&d| d != declarator && tree.is_live(d))
        .count();
    match (live, *in_list) {
        (0, true) => {
            tree.remove(decl);
            true
        }
        (0, false) => false,
        _ => {
            tree.remove(declarator);
            true
        }
    }
}
