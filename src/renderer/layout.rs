//! Text layout of a document subtree.
//!
//! Block tags start and end a line; everything else flows inline. Text
//! fields show their value in brackets with the selection marked, buttons
//! show their label in angle brackets.

use crate::dom::{Document, Host};
use crate::types::{ElementFlags, NodeId};

/// Tags that occupy their own line.
const BLOCK_TAGS: &[&str] = &[
    "body", "div", "p", "section", "header", "footer", "nav", "form", "ul", "li", "h1", "h2", "h3",
];

/// Presentation hints for a run of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpanStyle {
    pub focused: bool,
    pub selected: bool,
    pub link: bool,
    pub disabled: bool,
}

/// A run of text with one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: SpanStyle,
}

/// One output row.
pub type Line = Vec<Span>;

/// Lay out `node` and its descendants. Empty lines are dropped.
pub fn layout(doc: &Document, node: NodeId) -> Vec<Line> {
    let mut lines = vec![Line::new()];
    walk(doc, node, SpanStyle::default(), &mut lines);
    lines.retain(|line| !line.is_empty());
    lines
}

/// Plain-text rendition of [`layout`], one row per line.
pub fn render_plain(doc: &Document, node: NodeId) -> String {
    layout(doc, node)
        .iter()
        .map(|line| line.iter().map(|span| span.text.as_str()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn push(lines: &mut Vec<Line>, text: &str, style: SpanStyle) {
    if text.is_empty() {
        return;
    }
    if let Some(line) = lines.last_mut() {
        line.push(Span {
            text: text.to_string(),
            style,
        });
    }
}

fn break_line(lines: &mut Vec<Line>) {
    if lines.last().is_some_and(|line| !line.is_empty()) {
        lines.push(Line::new());
    }
}

fn walk(doc: &Document, node: NodeId, inherited: SpanStyle, lines: &mut Vec<Line>) {
    if let Some(text) = doc.text(node) {
        push(lines, text, inherited);
        return;
    }
    let Some(tag) = doc.tag(node) else { return };
    let flags = doc.flags(node).unwrap_or_default();
    let style = SpanStyle {
        focused: inherited.focused || doc.active_element() == Some(node),
        disabled: inherited.disabled || flags.contains(ElementFlags::DISABLED),
        ..inherited
    };

    let block = BLOCK_TAGS.contains(&tag);
    if block {
        break_line(lines);
    }
    match tag {
        "input" | "textarea" => push_field(doc, node, style, lines),
        "button" => {
            push(lines, "<", style);
            walk_children(doc, node, style, lines);
            push(lines, ">", style);
        }
        "a" => walk_children(doc, node, SpanStyle { link: true, ..style }, lines),
        _ => {
            walk_children(doc, node, style, lines);
            // Separate adjacent inline controls.
            if !block && !doc.children(node).is_empty() {
                push(lines, " ", inherited);
            }
        }
    }
    if block {
        break_line(lines);
    } else if matches!(tag, "input" | "textarea" | "button" | "a") {
        push(lines, " ", inherited);
    }
}

fn walk_children(doc: &Document, node: NodeId, style: SpanStyle, lines: &mut Vec<Line>) {
    for &child in doc.children(node) {
        walk(doc, child, style, lines);
    }
}

fn push_field(doc: &Document, node: NodeId, style: SpanStyle, lines: &mut Vec<Line>) {
    let value: Vec<char> = doc.value(node).unwrap_or_default().chars().collect();
    let slice = |from: usize, to: usize| value[from..to].iter().collect::<String>();

    push(lines, "[", style);
    match doc.selection(node) {
        Some(selection) if doc.active_element() == Some(node) => {
            let selection = selection.clamped(value.len());
            let selected = SpanStyle {
                selected: true,
                ..style
            };
            push(lines, &slice(0, selection.start), style);
            if selection.is_collapsed() {
                // Draw the caret over the next character, or a blank at the end.
                let caret_end = (selection.end + 1).min(value.len());
                let under = slice(selection.end, caret_end);
                push(lines, if under.is_empty() { " " } else { under.as_str() }, selected);
                push(lines, &slice(caret_end, value.len()), style);
            } else {
                push(lines, &slice(selection.start, selection.end), selected);
                push(lines, &slice(selection.end, value.len()), style);
            }
        }
        _ => push(lines, &slice(0, value.len()), style),
    }
    push(lines, "]", style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::materialize;
    use crate::primitives::{Node, button, div, input, link, p};
    use crate::types::Selection;

    fn mounted(tree: Node) -> (Document, NodeId) {
        let mut doc = Document::new();
        let root = materialize(&mut doc, &tree).unwrap();
        let body = doc.body();
        doc.append_child(body, root).unwrap();
        (doc, root)
    }

    #[test]
    fn test_blocks_take_their_own_lines() {
        let (doc, root) = mounted(div().child(p("one")).child(p("two")).into());
        assert_eq!(render_plain(&doc, root), "one\ntwo");
    }

    #[test]
    fn test_controls_flow_inline() {
        let (doc, root) = mounted(
            div()
                .child(link("#home", "Home"))
                .child(button("Go"))
                .into(),
        );
        assert_eq!(render_plain(&doc, root).trim_end(), "Home <Go>");
    }

    #[test]
    fn test_focused_field_marks_selection() {
        let (mut doc, root) = mounted(div().child(input().id("input").value("abcdef")).into());
        let field = doc.get_element_by_id("input").unwrap();
        doc.focus(field).unwrap();
        doc.set_selection(field, Selection::new(2, 4)).unwrap();

        let lines = layout(&doc, root);
        let selected: String = lines[0]
            .iter()
            .filter(|span| span.style.selected)
            .map(|span| span.text.as_str())
            .collect();
        assert_eq!(selected, "cd");
        assert!(
            lines[0]
                .iter()
                .filter(|span| !span.text.trim().is_empty())
                .all(|span| span.style.focused)
        );
        assert_eq!(render_plain(&doc, root).trim_end(), "[abcdef]");
    }

    #[test]
    fn test_caret_at_end_draws_blank() {
        let (mut doc, root) = mounted(input().id("input").value("ab").into());
        let field = doc.get_element_by_id("input").unwrap();
        doc.focus(field).unwrap();
        assert_eq!(render_plain(&doc, root).trim_end(), "[ab ]");
    }
}
