use std::ops::Range;

/// Index of a node in a [`SyntaxTree`] arena. Ids are handed out in pre-order,
/// so comparing two ids compares their document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

/// 1-based line and column of a node's first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone)]
pub struct Scope {
    parent: Option<ScopeId>,
}

impl Scope {
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// True for the module (file) scope.
    pub fn is_global(&self) -> bool {
        self.parent.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrLit {
    pub value: String,
    pub quote: char,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Program,
    ExprStatement {
        expr: Option<NodeId>,
        in_list: bool,
    },
    Call {
        callee: Option<NodeId>,
        args: Vec<NodeId>,
    },
    Member {
        object: Option<NodeId>,
        property: Option<String>,
    },
    Ident(String),
    Str(StrLit),
    Function {
        arrow: bool,
        expr_body: Option<NodeId>,
    },
    VarDecl {
        declarators: Vec<NodeId>,
        in_list: bool,
    },
    VarDeclarator {
        name: Option<String>,
        init: Option<NodeId>,
    },
    Import {
        source: Option<String>,
        local: Option<String>,
    },
    Spread,
    Object,
    Other(&'static str),
}

impl NodeKind {
    pub fn callee(&self) -> Option<NodeId> {
        match self {
            NodeKind::Call { callee, .. } => *callee,
            _ => None,
        }
    }
}

/// Expression built by a rewrite. `Node` splices an original subtree back in,
/// including any edits made inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Built {
    Call { callee: Box<Built>, args: Vec<Built> },
    Member { object: Box<Built>, property: String },
    Ident(String),
    Str(StrLit),
    /// Zero-argument arrow function returning its body.
    Factory(Box<Built>),
    EmptyBlock,
    Node(NodeId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Remove,
    Replace(Built),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub range: Range<usize>,
    pub position: Position,
    pub parent: Option<NodeId>,
    pub scope: ScopeId,
    pub edit: Option<Edit>,
}

/// Arena holding one parsed file. Parents are stored as ids, never as
/// references, so the tree can be edited in place while views hold ids.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    source: String,
    nodes: Vec<Node>,
    scopes: Vec<Scope>,
}

impl SyntaxTree {
    pub(crate) fn new(source: String) -> Self {
        Self {
            source,
            nodes: Vec::new(),
            scopes: vec![Scope { parent: None }],
        }
    }

    pub(crate) fn global_scope(&self) -> ScopeId {
        ScopeId(0)
    }

    pub(crate) fn open_scope(&mut self, parent: ScopeId) -> ScopeId {
        self.scopes.push(Scope {
            parent: Some(parent),
        });
        ScopeId(self.scopes.len() - 1)
    }

    pub(crate) fn push(
        &mut self,
        kind: NodeKind,
        range: Range<usize>,
        position: Position,
        parent: Option<NodeId>,
        scope: ScopeId,
    ) -> NodeId {
        self.nodes.push(Node {
            kind,
            range,
            position,
            parent,
            scope,
            edit: None,
        });
        NodeId(self.nodes.len() - 1)
    }

    pub(crate) fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.nodes[id.0].kind = kind;
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node ids in document order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn range(&self, id: NodeId) -> Range<usize> {
        self.nodes[id.0].range.clone()
    }

    pub fn position(&self, id: NodeId) -> Position {
        self.nodes[id.0].position
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    pub fn text(&self, id: NodeId) -> &str {
        &self.source[self.nodes[id.0].range.clone()]
    }

    pub fn scope(&self, id: NodeId) -> &Scope {
        &self.scopes[self.nodes[id.0].scope.0]
    }

    pub fn is_global(&self, id: NodeId) -> bool {
        self.scope(id).is_global()
    }

    pub fn ident_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    pub fn str_lit(&self, id: NodeId) -> Option<&StrLit> {
        match self.kind(id) {
            NodeKind::Str(lit) => Some(lit),
            _ => None,
        }
    }

    pub fn call_args(&self, id: NodeId) -> &[NodeId] {
        match self.kind(id) {
            NodeKind::Call { args, .. } => args,
            _ => &[],
        }
    }

    pub fn edit(&self, id: NodeId) -> Option<&Edit> {
        self.nodes[id.0].edit.as_ref()
    }

    /// Nodes carrying an edit, in document order.
    pub fn edits(&self) -> impl Iterator<Item = (NodeId, &Edit)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.edit.as_ref().map(|e| (NodeId(i), e)))
    }

    /// False once the node or one of its ancestors has been removed or
    /// replaced by a stand-in (`{}`, `undefined`) that drops its subtree.
    pub fn is_live(&self, id: NodeId) -> bool {
        std::iter::once(id).chain(self.ancestors(id)).all(|n| {
            !matches!(
                self.nodes[n.0].edit,
                Some(Edit::Remove | Edit::Replace(Built::EmptyBlock | Built::Ident(_)))
            )
        })
    }

    pub fn remove(&mut self, id: NodeId) {
        self.nodes[id.0].edit = Some(Edit::Remove);
    }

    pub fn replace(&mut self, id: NodeId, with: Built) {
        self.nodes[id.0].edit = Some(Edit::Replace(with));
    }
}
