use std::collections::HashMap;
use std::ops::Range;

use crate::syntax::{Built, Edit, NodeId, NodeKind, SyntaxTree};

#[derive(Debug, Clone)]
struct Span {
    id: NodeId,
    /// Bytes the edit replaces, widened for removals to whole lines or a
    /// separating comma.
    range: Range<usize>,
    node: Range<usize>,
    edit: Edit,
}

/// Serializes an edited tree. Text outside edited nodes is copied verbatim.
pub fn finalize(tree: &SyntaxTree) -> String {
    let finalizer = Finalizer::new(tree);
    // The root node can start after leading whitespace; cover the whole text.
    finalizer.render_span(0..tree.source().len(), tree.root())
}

struct Finalizer<'t> {
    tree: &'t SyntaxTree,
    spans: Vec<Span>,
}

impl<'t> Finalizer<'t> {
    fn new(tree: &'t SyntaxTree) -> Self {
        let mut spans: Vec<Span> = tree
            .edits()
            .map(|(id, edit)| Span {
                id,
                range: match edit {
                    Edit::Remove => removal_range(tree, id),
                    Edit::Replace(_) => tree.range(id),
                },
                node: tree.range(id),
                edit: edit.clone(),
            })
            .collect();
        spans.extend(emptied_blocks(tree).into_iter().map(|id| Span {
            id,
            range: tree.range(id),
            node: tree.range(id),
            edit: Edit::Replace(Built::EmptyBlock),
        }));
        spans.sort_by(|a, b| {
            a.range
                .start
                .cmp(&b.range.start)
                .then(b.range.end.cmp(&a.range.end))
                .then(a.id.cmp(&b.id))
        });
        Self { tree, spans }
    }

    /// Source text of `range` with the edits of `owner`'s descendants applied.
    fn render_span(&self, range: Range<usize>, owner: NodeId) -> String {
        let src = self.tree.source();
        let mut out = String::new();
        let mut cursor = range.start;
        for span in &self.spans {
            if span.id <= owner || span.node.start < cursor {
                continue;
            }
            // A widened removal that leaves `range` shrinks back to the node.
            let (start, end) = if span.range.end <= range.end {
                (span.range.start.max(cursor), span.range.end)
            } else if span.node.end <= range.end {
                (span.node.start, span.node.end)
            } else {
                continue;
            };
            out.push_str(&src[cursor..start]);
            if let Edit::Replace(built) = &span.edit {
                out.push_str(&self.render_built(built));
            }
            cursor = end;
        }
        out.push_str(&src[cursor..range.end]);
        out
    }

    fn render_node(&self, id: NodeId) -> String {
        match self.tree.edit(id) {
            Some(Edit::Replace(built)) => self.render_built(built),
            Some(Edit::Remove) => String::new(),
            None => self.render_span(self.tree.range(id), id),
        }
    }

    fn render_built(&self, built: &Built) -> String {
        match built {
            Built::Call { callee, args } => {
                let args: Vec<String> = args.iter().map(|a| self.render_built(a)).collect();
                format!("{}({})", self.render_built(callee), args.join(", "))
            }
            Built::Member { object, property } => {
                format!("{}.{}", self.render_built(object), property)
            }
            Built::Ident(name) => name.clone(),
            Built::Str(lit) => js_quote(&lit.value, lit.quote),
            Built::Factory(body) => {
                let text = self.render_built(body);
                let sequence = matches!(
                    **body,
                    Built::Node(id) if matches!(self.tree.kind(id), NodeKind::Other("sequence_expression"))
                );
                if sequence || text.trim_start().starts_with('{') {
                    format!("() => ({text})")
                } else {
                    format!("() => {text}")
                }
            }
            Built::EmptyBlock => "{}".to_string(),
            Built::Node(id) => self.render_node(*id),
        }
    }
}

fn is_statement(tree: &SyntaxTree, id: NodeId) -> bool {
    matches!(
        tree.kind(id),
        NodeKind::ExprStatement { .. } | NodeKind::VarDecl { .. } | NodeKind::Import { .. }
    )
}

fn removal_range(tree: &SyntaxTree, id: NodeId) -> Range<usize> {
    if let NodeKind::VarDeclarator { .. } = tree.kind(id) {
        return declarator_range(tree, id);
    }
    let range = tree.range(id);
    if !is_statement(tree, id) {
        return range;
    }
    let src = tree.source().as_bytes();
    let blank = |b: &u8| matches!(b, b' ' | b'\t' | b'\r');

    let line_start = src[..range.start]
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |i| i + 1);
    let line_end = src[range.end..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(src.len(), |i| range.end + i);
    if !src[line_start..range.start].iter().all(blank) || !src[range.end..line_end].iter().all(blank) {
        return range;
    }
    let mut start = line_start;
    let mut end = (line_end + 1).min(src.len());

    let before = src[..start].iter().rposition(|b| !b.is_ascii_whitespace());
    let after = src[end..]
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map(|i| end + i);
    // First statement of a block: no blank lines right after the brace.
    if before.is_some_and(|i| src[i] == b'{') {
        end = blank_lines_after(src, end);
    }
    // Last statement of a block: no blank lines right before the brace.
    if after.is_some_and(|i| src[i] == b'}') {
        start = blank_lines_before(src, start);
    }
    start..end
}

fn blank_lines_after(src: &[u8], mut pos: usize) -> usize {
    while let Some(nl) = src[pos..].iter().position(|&b| b == b'\n') {
        if !src[pos..pos + nl].iter().all(|b| b.is_ascii_whitespace()) {
            break;
        }
        pos += nl + 1;
    }
    pos
}

fn blank_lines_before(src: &[u8], mut pos: usize) -> usize {
    // `pos` sits at a line start; step back over whole blank lines.
    while pos > 0 {
        let prev_start = src[..pos - 1]
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        if prev_start == 0 || !src[prev_start..pos - 1].iter().all(|b| b.is_ascii_whitespace()) {
            break;
        }
        pos = prev_start;
    }
    pos
}

fn declarator_range(tree: &SyntaxTree, id: NodeId) -> Range<usize> {
    let range = tree.range(id);
    let Some(NodeKind::VarDecl { declarators, .. }) = tree.parent(id).map(|p| tree.kind(p)) else {
        return range;
    };
    let Some(i) = declarators.iter().position(|&d| d == id) else {
        return range;
    };
    if let Some(&next) = declarators.get(i + 1) {
        range.start..tree.range(next).start
    } else if let Some(&prev) = i.checked_sub(1).and_then(|p| declarators.get(p)) {
        tree.range(prev).end..range.end
    } else {
        range
    }
}

/// Blocks whose every statement was removed and that hold nothing else.
fn emptied_blocks(tree: &SyntaxTree) -> Vec<NodeId> {
    let mut children: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    for id in tree.ids() {
        if let Some(parent) = tree.parent(id) {
            if matches!(tree.kind(parent), NodeKind::Other("statement_block")) {
                children.entry(parent).or_default().push(id);
            }
        }
    }
    let src = tree.source();
    let mut blocks: Vec<NodeId> = children
        .into_iter()
        .filter(|(_, stmts)| {
            stmts
                .iter()
                .all(|&s| matches!(tree.edit(s), Some(Edit::Remove)))
        })
        .filter(|(block, stmts)| {
            let range = tree.range(*block);
            let mut cursor = range.start;
            let mut rest = String::new();
            for s in stmts {
                let r = tree.range(*s);
                rest.push_str(&src[cursor..r.start]);
                cursor = r.end;
            }
            rest.push_str(&src[cursor..range.end]);
            rest.chars().all(|c| c.is_whitespace() || matches!(c, '{' | '}' | ';'))
        })
        .map(|(block, _)| block)
        .filter(|&block| tree.edit(block).is_none())
        .collect();
    blocks.sort();
    blocks
}

/// Renders `value` as a JavaScript string literal delimited by `quote`.
pub fn js_quote(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_and_escapes() {
        assert_eq!(js_quote("a'b", '\''), r"'a\'b'");
        assert_eq!(js_quote("a'b", '"'), r#""a'b""#);
        assert_eq!(js_quote("c:\\x\n", '\''), r"'c:\\x\n'");
    }
}
