use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;

use tracing::debug;
use tree_sitter::{Language, Node as TsNode, Parser};

use crate::error::TransformError;
use crate::options::ParserKind;
use crate::syntax::{NodeId, NodeKind, Position, ScopeId, StrLit, SyntaxTree};

fn language(parser: ParserKind) -> Language {
    match parser {
        ParserKind::Babel | ParserKind::Babylon => tree_sitter_javascript::LANGUAGE.into(),
        ParserKind::Ts => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        // Flow annotations alongside JSX; Flow-only forms like `?T` do not parse.
        ParserKind::Tsx | ParserKind::Flow => tree_sitter_typescript::LANGUAGE_TSX.into(),
    }
}

/// Parses `source` and lowers it into a [`SyntaxTree`]. Any syntax error is
/// fatal; no partial tree is returned.
pub fn parse(source: &str, parser: ParserKind) -> Result<SyntaxTree, TransformError> {
    let mut ts = Parser::new();
    ts.set_language(&language(parser))
        .map_err(|source| TransformError::Language { parser, source })?;
    let tree = ts
        .parse(source, None)
        .ok_or(TransformError::Aborted(parser))?;
    let root = tree.root_node();
    if root.has_error() {
        let at = first_error(root).unwrap_or(root).start_position();
        return Err(TransformError::Parse {
            parser,
            line: at.row + 1,
            column: at.column + 1,
        });
    }

    let mut lowering = Lowering {
        source,
        tree: SyntaxTree::new(source.to_string()),
        ids: HashMap::new(),
    };
    let scope = lowering.tree.global_scope();
    lowering.lower(root, scope);
    debug!(parser = %parser, nodes = lowering.tree.len(), "lowered syntax tree");
    Ok(lowering.tree)
}

fn first_error(root: TsNode<'_>) -> Option<TsNode<'_>> {
    let mut node = root;
    loop {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        let mut cursor = node.walk();
        let next = node
            .children(&mut cursor)
            .find(|c| c.has_error() || c.is_missing());
        node = next?;
    }
}

fn opens_scope(kind: &str) -> bool {
    matches!(
        kind,
        "function_expression"
            | "function"
            | "function_declaration"
            | "generator_function"
            | "generator_function_declaration"
            | "arrow_function"
            | "method_definition"
            | "class_static_block"
            | "catch_clause"
    )
}

fn in_statement_list(node: TsNode<'_>) -> bool {
    node.parent().is_some_and(|p| {
        matches!(
            p.kind(),
            "program" | "statement_block" | "switch_case" | "switch_default"
        )
    })
}

fn named_children(node: TsNode<'_>) -> Vec<TsNode<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect()
}

struct Lowering<'s> {
    source: &'s str,
    tree: SyntaxTree,
    ids: HashMap<usize, NodeId>,
}

impl<'s> Lowering<'s> {
    /// Walks with an explicit stack; nesting depth is bounded only by memory.
    fn lower(&mut self, root: TsNode<'_>, scope: ScopeId) {
        let mut pending = vec![(root, None, scope)];
        let mut lowered = Vec::new();
        while let Some((node, parent, scope)) = pending.pop() {
            let start = node.start_position();
            let id = self.tree.push(
                NodeKind::Other(node.kind()),
                node.byte_range(),
                Position {
                    line: start.row + 1,
                    column: start.column + 1,
                },
                parent,
                scope,
            );
            self.ids.insert(node.id(), id);

            // String contents are decoded from the literal text instead.
            if node.kind() != "string" {
                let inner = if opens_scope(node.kind()) {
                    self.tree.open_scope(scope)
                } else {
                    scope
                };
                // Reversed so the first child pops next and ids stay pre-order.
                for child in named_children(node).into_iter().rev() {
                    pending.push((child, Some(id), inner));
                }
            }
            lowered.push((id, node));
        }

        for (id, node) in lowered {
            let kind = self.classify(node);
            self.tree.set_kind(id, kind);
        }
    }

    fn lookup(&self, node: Option<TsNode<'_>>) -> Option<NodeId> {
        node.and_then(|n| self.ids.get(&n.id()).copied())
    }

    fn text(&self, node: TsNode<'_>) -> &'s str {
        &self.source[node.byte_range()]
    }

    fn classify(&self, node: TsNode<'_>) -> NodeKind {
        match node.kind() {
            "program" => NodeKind::Program,
            "expression_statement" => NodeKind::ExprStatement {
                expr: self.lookup(named_children(node).into_iter().next()),
                in_list: in_statement_list(node),
            },
            "call_expression" => match node.child_by_field_name("arguments") {
                Some(args) if args.kind() == "arguments" => NodeKind::Call {
                    callee: self.lookup(node.child_by_field_name("function")),
                    args: named_children(args)
                        .into_iter()
                        .filter_map(|a| self.lookup(Some(a)))
                        .collect(),
                },
                // tagged template
                _ => NodeKind::Other("call_expression"),
            },
            "member_expression" => NodeKind::Member {
                object: self.lookup(node.child_by_field_name("object")),
                property: node
                    .child_by_field_name("property")
                    .filter(|p| p.kind() == "property_identifier")
                    .map(|p| self.text(p).to_string()),
            },
            "identifier" => NodeKind::Ident(self.text(node).to_string()),
            "string" => NodeKind::Str(decode_string(self.text(node))),
            "arrow_function" => NodeKind::Function {
                arrow: true,
                expr_body: node
                    .child_by_field_name("body")
                    .filter(|b| b.kind() != "statement_block")
                    .and_then(|b| self.lookup(Some(b))),
            },
            "function_expression"
            | "function"
            | "function_declaration"
            | "generator_function"
            | "generator_function_declaration"
            | "method_definition" => NodeKind::Function {
                arrow: false,
                expr_body: None,
            },
            "lexical_declaration" | "variable_declaration" => NodeKind::VarDecl {
                declarators: named_children(node)
                    .into_iter()
                    .filter(|c| c.kind() == "variable_declarator")
                    .filter_map(|c| self.lookup(Some(c)))
                    .collect(),
                in_list: in_statement_list(node),
            },
            "variable_declarator" => NodeKind::VarDeclarator {
                name: node
                    .child_by_field_name("name")
                    .filter(|n| n.kind() == "identifier")
                    .map(|n| self.text(n).to_string()),
                init: self.lookup(node.child_by_field_name("value")),
            },
            "import_statement" => self.classify_import(node),
            "spread_element" => NodeKind::Spread,
            "object" => NodeKind::Object,
            other => NodeKind::Other(other),
        }
    }

    fn classify_import(&self, node: TsNode<'_>) -> NodeKind {
        let mut source = node.child_by_field_name("source");
        let mut local = None;
        for child in named_children(node) {
            match child.kind() {
                "import_clause" => {
                    for binding in named_children(child) {
                        match binding.kind() {
                            "identifier" => local = Some(self.text(binding).to_string()),
                            "namespace_import" => {
                                local = named_children(binding)
                                    .into_iter()
                                    .find(|n| n.kind() == "identifier")
                                    .map(|n| self.text(n).to_string());
                            }
                            _ => {}
                        }
                    }
                }
                // import x = require('y')
                "import_require_clause" => {
                    local = named_children(child)
                        .into_iter()
                        .find(|n| n.kind() == "identifier")
                        .map(|n| self.text(n).to_string());
                    source = child.child_by_field_name("source");
                }
                _ => {}
            }
        }
        NodeKind::Import {
            source: source.map(|s| decode_string(self.text(s)).value),
            local,
        }
    }
}

/// Decodes a quoted JavaScript string literal, quotes included.
pub(crate) fn decode_string(raw: &str) -> StrLit {
    let quote = raw.chars().next().unwrap_or('\'');
    let inner = raw
        .strip_prefix(quote)
        .and_then(|s| s.strip_suffix(quote))
        .unwrap_or(raw);
    StrLit {
        value: unescape(inner),
        quote,
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('0') => out.push('\0'),
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                push_code_point(&mut out, u32::from_str_radix(&hex, 16).ok(), &hex, "\\x");
            }
            Some('u') => {
                let hex: String = if chars.peek() == Some(&'{') {
                    chars.next();
                    chars.by_ref().take_while(|&c| c != '}').collect()
                } else {
                    chars.by_ref().take(4).collect()
                };
                let mut code = u32::from_str_radix(&hex, 16).ok();
                if let Some(high @ 0xD800..=0xDBFF) = code {
                    if let Some(low) = low_surrogate(&chars) {
                        chars.nth(5);
                        code = Some(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00));
                    }
                }
                push_code_point(&mut out, code, &hex, "\\u");
            }
            // line continuation
            Some('\r') => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            Some('\n') | Some('\u{2028}') | Some('\u{2029}') => {}
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// The `\uDC00`-`\uDFFF` escape that completes a surrogate pair, if next.
fn low_surrogate(rest: &Peekable<Chars<'_>>) -> Option<u32> {
    let mut ahead = rest.clone();
    if ahead.next() != Some('\\') || ahead.next() != Some('u') {
        return None;
    }
    let hex: String = ahead.take(4).collect();
    u32::from_str_radix(&hex, 16)
        .ok()
        .filter(|c| (0xDC00..=0xDFFF).contains(c))
}

fn push_code_point(out: &mut String, code: Option<u32>, hex: &str, prefix: &str) {
    match code.map(char::from_u32) {
        Some(Some(c)) => out.push(c),
        Some(None) => out.push(char::REPLACEMENT_CHARACTER),
        None => {
            out.push_str(prefix);
            out.push_str(hex);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_escapes_and_quote() {
        let lit = decode_string(r#""a\"b\\c\n\x41B\u{43}""#);
        assert_eq!(lit.quote, '"');
        assert_eq!(lit.value, "a\"b\\c\nABC");
    }

    #[test]
    fn joins_surrogate_pair_escapes() {
        assert_eq!(decode_string(r"'\uD83D\uDE00'").value, "\u{1F600}");
        assert_eq!(decode_string(r"'\uD83Dx'").value, "\u{FFFD}x");
    }

    #[test]
    fn deep_nesting_does_not_exhaust_the_stack() {
        let depth = 5000;
        let source = format!("x = {}1{};\n", "[".repeat(depth), "]".repeat(depth));
        let tree = parse(&source, ParserKind::Babel).expect("parse");
        assert!(tree.len() > depth);
        let innermost = tree.ids().last().expect("nodes");
        assert_eq!(tree.text(innermost), "1");
        assert_eq!(tree.ancestors(innermost).count(), depth + 3);
    }

    #[test]
    fn flow_annotations_parse() {
        let tree = parse(
            "// @flow\nfunction f(x: number): void { mockery.registerMock('a', 1); }\n",
            ParserKind::Flow,
        )
        .expect("parse");
        assert!(tree.ids().any(|id| tree.str_lit(id).is_some_and(|l| l.value == "a")));
    }

    #[test]
    fn keeps_plain_single_quoted_path() {
        let lit = decode_string("'../../lib/x'");
        assert_eq!(lit.quote, '\'');
        assert_eq!(lit.value, "../../lib/x");
    }

    #[test]
    fn rejects_syntax_errors() {
        let err = parse("const = ;", ParserKind::Babel).unwrap_err();
        assert!(matches!(err, TransformError::Parse { line: 1, .. }), "{err}");
    }

    #[test]
    fn scopes_follow_functions_not_blocks() {
        let tree = parse(
            "{ require('a') }\nfunction f() { require('b') }\n",
            ParserKind::Babel,
        )
        .expect("parse");
        let globals: Vec<bool> = tree
            .ids()
            .filter(|&id| matches!(tree.kind(id), NodeKind::Call { .. }))
            .map(|id| tree.is_global(id))
            .collect();
        assert_eq!(globals, vec![true, false]);
    }

    #[test]
    fn typescript_import_equals_is_an_import() {
        let tree = parse("import mockery = require('mockery');\n", ParserKind::Ts).expect("parse");
        let import = tree
            .ids()
            .find_map(|id| match tree.kind(id) {
                NodeKind::Import { source, local } => Some((source.clone(), local.clone())),
                _ => None,
            })
            .expect("import node");
        assert_eq!(
            import,
            (Some("mockery".to_string()), Some("mockery".to_string()))
        );
    }
}
