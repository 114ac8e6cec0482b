//! Line-diffing terminal renderer.
//!
//! The TerminalRenderer lays out the mounted tree, compares each row with
//! the previous frame and only rewrites rows that changed.
//!
//! # Algorithm
//!
//! 1. Wrap output in a synchronized update
//! 2. For each row of the new frame:
//!    - If the previous frame had the same row: skip
//!    - Otherwise: clear the row and print its spans
//! 3. Clear rows the previous frame had beyond the new height
//! 4. Flush the writer and keep the frame for the next comparison

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{
    self, BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};

use super::layout::{Line, SpanStyle, layout};
use crate::dom::Document;
use crate::types::NodeId;

/// Renders a document subtree to a terminal, row by row.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    previous: Option<Vec<Line>>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous frame so the next render repaints every row.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    /// Render `node` into `out`.
    ///
    /// Returns true if any row was written.
    pub fn render(&mut self, doc: &Document, node: NodeId, out: &mut impl Write) -> io::Result<bool> {
        let frame = layout(doc, node);
        let mut changed = false;

        queue!(out, BeginSynchronizedUpdate)?;
        if self.previous.is_none() {
            queue!(out, Clear(ClearType::All))?;
        }

        for (row, line) in frame.iter().enumerate() {
            let unchanged = self
                .previous
                .as_ref()
                .and_then(|prev| prev.get(row))
                .is_some_and(|prev| prev == line);
            if unchanged {
                continue;
            }
            changed = true;
            queue!(out, MoveTo(0, row_u16(row)), Clear(ClearType::CurrentLine))?;
            for span in line {
                write_span(out, &span.text, span.style)?;
            }
        }

        let previous_height = self.previous.as_ref().map_or(0, Vec::len);
        for row in frame.len()..previous_height {
            changed = true;
            queue!(out, MoveTo(0, row_u16(row)), Clear(ClearType::CurrentLine))?;
        }

        queue!(out, EndSynchronizedUpdate)?;
        out.flush()?;

        tracing::trace!(rows = frame.len(), changed, "terminal frame");
        self.previous = Some(frame);
        Ok(changed)
    }
}

fn row_u16(row: usize) -> u16 {
    u16::try_from(row).unwrap_or(u16::MAX)
}

fn write_span(out: &mut impl Write, text: &str, style: SpanStyle) -> io::Result<()> {
    if style.focused {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if style.selected {
        queue!(out, SetAttribute(Attribute::Reverse))?;
    }
    if style.link {
        queue!(out, SetAttribute(Attribute::Underlined))?;
    }
    if style.disabled {
        queue!(out, SetAttribute(Attribute::Dim))?;
    }
    queue!(out, Print(text), SetAttribute(Attribute::Reset))
}

// =============================================================================
// Terminal session
// =============================================================================

/// Raw mode plus alternate screen, undone on drop.
pub struct TerminalSession {
    _private: (),
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Host, materialize};
    use crate::primitives::{Node, div, p};

    fn setup(tree: Node) -> (Document, NodeId) {
        let mut doc = Document::new();
        let root = materialize(&mut doc, &tree).unwrap();
        let body = doc.body();
        doc.append_child(body, root).unwrap();
        (doc, root)
    }

    #[test]
    fn test_first_frame_writes_everything() {
        let (doc, root) = setup(div().child(p("hello")).into());
        let mut renderer = TerminalRenderer::new();
        let mut out = Vec::new();

        assert!(renderer.render(&doc, root, &mut out).unwrap());
        let written = String::from_utf8_lossy(&out);
        assert!(written.contains("hello"));
    }

    #[test]
    fn test_unchanged_frame_skips_rows() {
        let (doc, root) = setup(div().child(p("hello")).into());
        let mut renderer = TerminalRenderer::new();
        renderer.render(&doc, root, &mut Vec::new()).unwrap();

        let mut out = Vec::new();
        assert!(!renderer.render(&doc, root, &mut out).unwrap());
        assert!(!String::from_utf8_lossy(&out).contains("hello"));
    }

    #[test]
    fn test_shrinking_frame_clears_rows() {
        let (mut doc, root) = setup(div().child(p("one")).child(p("two")).into());
        let mut renderer = TerminalRenderer::new();
        renderer.render(&doc, root, &mut Vec::new()).unwrap();

        let body = doc.body();
        doc.clear_children(body).unwrap();
        let smaller = materialize(&mut doc, &div().child(p("one")).into()).unwrap();
        doc.append_child(body, smaller).unwrap();

        assert!(renderer.render(&doc, smaller, &mut Vec::new()).unwrap());
    }

    #[test]
    fn test_invalidate_repaints() {
        let (doc, root) = setup(p("hello").into());
        let mut renderer = TerminalRenderer::new();
        renderer.render(&doc, root, &mut Vec::new()).unwrap();
        renderer.invalidate();

        let mut out = Vec::new();
        assert!(renderer.render(&doc, root, &mut out).unwrap());
        assert!(String::from_utf8_lossy(&out).contains("hello"));
    }
}
