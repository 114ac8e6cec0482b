//! Counter Example - use_state end to end
//!
//! A single component with a count and a button. Tab focuses the button,
//! Enter clicks it, Escape quits. Every click re-renders the whole tree and
//! the button keeps focus because it carries an identifier.
//!
//! Run with: cargo run --example counter
//! Logs: RUST_LOG=spark_hooks=debug cargo run --example counter 2> counter.log

use std::io;
use std::time::Duration;

use spark_hooks::renderer::TerminalSession;
use spark_hooks::state::{InputEvent, poll_event};
use spark_hooks::{
    Document, KeyOutcome, Node, TerminalRenderer, button, div, mount, p, route_key, use_state,
};
use tracing_subscriber::EnvFilter;

fn counter() -> Node {
    let (count, set_count) = use_state(0u32);

    div()
        .child(p(format!("Count: {count}")))
        .child(
            button("Increment")
                .id("increment")
                .on_click(move || set_count.update(|c| c + 1)),
        )
        .child(button("Reset").id("reset").on_click(move || set_count.set(0)))
        .child(p("Tab to move, Enter to press, Esc to quit"))
        .into()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let doc = Document::shared();
    let container = doc.borrow_mut().create_container("root")?;
    mount(doc.clone(), container, counter)?;

    let _session = TerminalSession::enter()?;
    let mut renderer = TerminalRenderer::new();
    let mut stdout = io::stdout();

    loop {
        renderer.render(&doc.borrow(), container, &mut stdout)?;

        match poll_event(Duration::from_millis(100))? {
            Some(InputEvent::Key(key)) => {
                if route_key(&doc, &key)? == KeyOutcome::Quit {
                    break;
                }
            }
            Some(InputEvent::Resize(..)) => renderer.invalidate(),
            _ => {}
        }
    }

    Ok(())
}
