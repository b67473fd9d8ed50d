use crate::syntax::{NodeId, NodeKind, SyntaxTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeConstraint {
    Any,
    NonGlobal,
}

#[derive(Debug, Clone, Copy)]
pub enum Property<'a> {
    Named(&'a str),
    OneOf(&'a [String]),
    Any,
}

impl Property<'_> {
    fn accepts(&self, name: &str) -> bool {
        match self {
            Property::Named(n) => *n == name,
            Property::OneOf(names) => names.iter().any(|n| n == name),
            Property::Any => true,
        }
    }
}

/// Callee identity: a bare identifier or `object.property`.
#[derive(Debug, Clone, Copy)]
pub enum Callee<'a> {
    Ident(&'a str),
    Member {
        object: &'a str,
        property: Property<'a>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Any,
    Exactly(usize),
}

#[derive(Debug, Clone, Copy)]
pub struct CallShape<'a> {
    pub callee: Callee<'a>,
    pub arity: Arity,
    /// Leading arguments that must be string literals.
    pub literal_args: usize,
}

impl<'a> CallShape<'a> {
    pub fn new(callee: Callee<'a>) -> Self {
        Self {
            callee,
            arity: Arity::Any,
            literal_args: 0,
        }
    }

    pub fn arity(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }

    pub fn literal_args(mut self, n: usize) -> Self {
        self.literal_args = n;
        self
    }

    pub fn matches(&self, tree: &SyntaxTree, id: NodeId) -> bool {
        let NodeKind::Call { callee, args } = tree.kind(id) else {
            return false;
        };
        if !callee.is_some_and(|c| callee_matches(tree, c, &self.callee)) {
            return false;
        }
        if let Arity::Exactly(n) = self.arity {
            if args.len() != n {
                return false;
            }
        }
        args.len() >= self.literal_args
            && args[..self.literal_args]
                .iter()
                .all(|&a| tree.str_lit(a).is_some())
    }
}

fn callee_matches(tree: &SyntaxTree, id: NodeId, want: &Callee<'_>) -> bool {
    match (want, tree.kind(id)) {
        (Callee::Ident(name), NodeKind::Ident(got)) => got == name,
        (
            Callee::Member { object, property },
            NodeKind::Member {
                object: Some(obj),
                property: Some(prop),
            },
        ) => tree.ident_name(*obj) == Some(*object) && property.accepts(prop),
        _ => false,
    }
}

/// Every live call matching `shape` under `scope`, in document order. The
/// result is a snapshot: callers may edit the tree while walking it.
pub fn find(tree: &SyntaxTree, shape: &CallShape<'_>, scope: ScopeConstraint) -> Vec<NodeId> {
    tree.ids()
        .filter(|&id| shape.matches(tree, id))
        .filter(|&id| scope == ScopeConstraint::Any || !tree.is_global(id))
        .filter(|&id| tree.is_live(id))
        .collect()
}

/// `require('<path>')`, one literal argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLoadCall {
    pub node: NodeId,
    pub path: String,
    pub is_global: bool,
}

impl ModuleLoadCall {
    pub fn shape(loader: &str) -> CallShape<'_> {
        CallShape::new(Callee::Ident(loader))
            .arity(Arity::Exactly(1))
            .literal_args(1)
    }

    pub fn classify(tree: &SyntaxTree, id: NodeId, loader: &str) -> Option<Self> {
        if !Self::shape(loader).matches(tree, id) {
            return None;
        }
        let path = tree.str_lit(tree.call_args(id)[0])?.value.clone();
        Some(Self {
            node: id,
            path,
            is_global: tree.is_global(id),
        })
    }
}

/// `<binding>.registerMock('<path>', <value>)` in its only supported form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockRegistration {
    pub node: NodeId,
    pub path_arg: NodeId,
    pub raw_path: String,
    pub quote: char,
    pub value: NodeId,
}

impl MockRegistration {
    /// Any call to the registration method, whatever its arguments.
    pub fn candidates<'a>(binding: &'a str, method: &'a str) -> CallShape<'a> {
        CallShape::new(Callee::Member {
            object: binding,
            property: Property::Named(method),
        })
    }

    /// `None` unless the call has exactly two arguments, the first a string
    /// literal and the second a plain expression.
    pub fn classify(tree: &SyntaxTree, id: NodeId) -> Option<Self> {
        let [path_arg, value] = tree.call_args(id) else {
            return None;
        };
        let lit = tree.str_lit(*path_arg)?;
        if matches!(tree.kind(*value), NodeKind::Spread) {
            return None;
        }
        Some(Self {
            node: id,
            path_arg: *path_arg,
            raw_path: lit.value.clone(),
            quote: lit.quote,
            value: *value,
        })
    }
}
