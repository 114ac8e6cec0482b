//! Product Search Example - navigation, a reducer state machine and effects
//!
//! Two pages share one tree: a home page with a product search and an about
//! page. Navigation is a `use_state` "location". The search is a
//! `use_reducer` state machine over idle/loading/loaded/empty/error:
//!
//! - an effect persists the query whenever it changes
//! - an effect starts a fetch whenever the state enters loading
//!
//! Fetches are queued and resolved by the event loop against a local
//! catalog after the render that asked for them, then fed back through
//! `dispatch`. That is the only way outside work re-enters the runtime.
//!
//! Run with: cargo run --example product_search
//! Logs: RUST_LOG=spark_hooks=debug,product_search=debug cargo run --example product_search 2> search.log

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::rc::Rc;
use std::time::Duration;

use spark_hooks::hooks::Dispatch;
use spark_hooks::renderer::TerminalSession;
use spark_hooks::state::{InputEvent, poll_event};
use spark_hooks::{
    Document, Element, KeyOutcome, Node, TerminalRenderer, button, deps, div, input, link, mount,
    p, route_key, use_effect, use_reducer, use_state,
};
use tracing_subscriber::EnvFilter;

const CATALOG: &[&str] = &[
    "iPhone 9",
    "iPhone X",
    "Samsung Universe 9",
    "OPPO F19",
    "Huawei P30",
    "MacBook Pro",
    "Samsung Galaxy Book",
    "Microsoft Surface Laptop 4",
    "HP Pavilion 15",
    "Brown Perfume",
    "Fog Scent Perfume",
    "Eau De Perfume Spray",
    "Tree Oil 30ml",
    "Hyaluronic Acid Serum",
];

/// Queries longer than this make the catalog "fail", to show the error state.
const MAX_QUERY_LEN: usize = 24;

const QUERY_KEY: &str = "inputValue";

// =============================================================================
// Services
// =============================================================================

type SearchDispatch = Dispatch<SearchState, Action>;

struct PendingFetch {
    query: String,
    dispatch: SearchDispatch,
}

/// Outside-world stand-ins: persisted preferences, location history and the
/// fetch queue.
#[derive(Default)]
struct Services {
    storage: RefCell<HashMap<String, String>>,
    history: RefCell<Vec<String>>,
    pending: RefCell<VecDeque<PendingFetch>>,
}

impl Services {
    fn resolve_pending(&self) -> usize {
        let mut resolved = 0;
        loop {
            // Dispatching renders, and the render may queue another fetch.
            let next = self.pending.borrow_mut().pop_front();
            let Some(job) = next else { break };
            let action = search_catalog(&job.query);
            tracing::debug!(query = %job.query, ?action, "fetch resolved");
            job.dispatch.dispatch(action);
            resolved += 1;
        }
        resolved
    }
}

fn search_catalog(query: &str) -> Action {
    if query.chars().count() > MAX_QUERY_LEN {
        return Action::FetchError(format!("query longer than {MAX_QUERY_LEN} characters"));
    }
    let needle = query.to_lowercase();
    let products: Vec<String> = CATALOG
        .iter()
        .filter(|title| title.to_lowercase().contains(&needle))
        .map(|title| title.to_string())
        .collect();
    if products.is_empty() {
        Action::FetchEmpty
    } else {
        Action::FetchSuccess(products)
    }
}

// =============================================================================
// Search State Machine
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tag {
    Idle,
    Loading,
    Loaded,
    Empty,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
struct SearchState {
    input_value: String,
    tag: Tag,
    products: Vec<String>,
    error_message: String,
}

#[derive(Clone, Debug)]
enum Action {
    Fetch,
    FetchSuccess(Vec<String>),
    FetchEmpty,
    FetchError(String),
    ChangeInput(String),
    ClearInput,
}

fn reducer(prev: SearchState, action: Action) -> SearchState {
    use Tag::*;

    match (prev.tag, action) {
        (Idle | Loaded | Empty | Error, Action::Fetch) => SearchState {
            tag: Loading,
            ..prev
        },
        (Loading, Action::FetchSuccess(products)) => SearchState {
            tag: Loaded,
            error_message: String::new(),
            products,
            ..prev
        },
        (Loading, Action::FetchEmpty) => SearchState {
            tag: Empty,
            error_message: String::new(),
            products: Vec::new(),
            ..prev
        },
        (Loading, Action::FetchError(error_message)) => SearchState {
            tag: Error,
            error_message,
            products: Vec::new(),
            ..prev
        },
        (Loaded | Empty | Error, Action::ChangeInput(input_value)) => SearchState {
            input_value,
            ..prev
        },
        (Loaded | Empty | Error, Action::ClearInput) => SearchState {
            input_value: String::new(),
            ..prev
        },
        // Everything else leaves the state alone.
        _ => prev,
    }
}

// =============================================================================
// Components
// =============================================================================

fn nav_link(id: &str, href: &str, label: &str, on_click: impl Fn() + 'static) -> Element {
    link(href, label).id(id).on_click(on_click)
}

fn navbar(go_home: Rc<dyn Fn()>, go_about: Rc<dyn Fn()>) -> Element {
    div()
        .child(nav_link("link-home", "#home", "Home", move || go_home()))
        .child(nav_link("link-about", "#about", "About", move || go_about()))
}

fn about_page(go_home: Rc<dyn Fn()>) -> Node {
    div()
        .child(nav_link("link-back", "#home", "Back to Home", move || go_home()))
        .child(p("Welcome to About Page"))
        .into()
}

fn search_input(state: &SearchState, send: &SearchDispatch) -> Element {
    let loading = state.tag == Tag::Loading;
    let on_change = send.clone();
    let on_clear = send.clone();
    let on_submit = send.clone();

    div()
        .child(
            input()
                .id("input")
                .attr("placeholder", "enter a product")
                .value(state.input_value.clone())
                .disabled(loading)
                .on_input(move |value| on_change.dispatch(Action::ChangeInput(value.to_string()))),
        )
        .child(
            button("Clear")
                .id("clear")
                .disabled(loading)
                .on_click(move || on_clear.dispatch(Action::ClearInput)),
        )
        .child(
            button("Submit")
                .id("submit")
                .disabled(loading)
                .on_click(move || on_submit.dispatch(Action::Fetch)),
        )
}

fn product_list(state: &SearchState) -> Element {
    let list = div();
    match state.tag {
        Tag::Loading => list.child(p("Loading Products...")),
        Tag::Error => list.child(p(state.error_message.clone())),
        Tag::Empty => list.child(p("Product Empty")),
        Tag::Loaded => list.children(state.products.iter().map(|title| p(title.clone()))),
        Tag::Idle => list,
    }
}

fn home_page(services: &Rc<Services>, go_home: Rc<dyn Fn()>, go_about: Rc<dyn Fn()>) -> Node {
    let saved = services.storage.borrow().get(QUERY_KEY).cloned();
    let (state, send) = use_reducer(
        reducer,
        SearchState {
            input_value: saved.unwrap_or_default(),
            tag: Tag::Idle,
            products: Vec::new(),
            error_message: String::new(),
        },
    );

    {
        let services = services.clone();
        let query = state.input_value.clone();
        use_effect(
            move || {
                services
                    .storage
                    .borrow_mut()
                    .insert(QUERY_KEY.to_string(), query);
            },
            Some(deps![state.input_value.clone()]),
        );
    }

    {
        let services = services.clone();
        let send = send.clone();
        let tag = state.tag;
        let query = state.input_value.clone();
        use_effect(
            move || match tag {
                Tag::Idle => send.dispatch(Action::Fetch),
                Tag::Loading => {
                    tracing::debug!(%query, "fetch queued");
                    services
                        .pending
                        .borrow_mut()
                        .push_back(PendingFetch { query, dispatch: send });
                }
                _ => {}
            },
            Some(deps![state.tag, state.input_value.clone()]),
        );
    }

    div()
        .child(navbar(go_home, go_about))
        .child(p("Welcome to Home Page"))
        .child(search_input(&state, &send))
        .child(p(state.input_value.clone()))
        .child(product_list(&state))
        .into()
}

fn app(services: &Rc<Services>) -> Node {
    let (location, set_location) = use_state(String::from("#home"));

    {
        let services = services.clone();
        let visited = location.clone();
        use_effect(
            move || services.history.borrow_mut().push(visited),
            Some(deps![location.clone()]),
        );
    }

    let go_home: Rc<dyn Fn()> = Rc::new(move || set_location.set("#home".to_string()));
    let go_about: Rc<dyn Fn()> = Rc::new(move || set_location.set("#about".to_string()));

    // Both pages render every pass so their hooks keep the same slots.
    let home = home_page(services, go_home.clone(), go_about);
    let about = about_page(go_home);

    match location.as_str() {
        "#about" => about,
        _ => home,
    }
}

// =============================================================================
// Event Loop
// =============================================================================

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let services = Rc::new(Services::default());
    let doc = Document::shared();
    let container = doc.borrow_mut().create_container("root")?;
    {
        let services = services.clone();
        mount(doc.clone(), container, move || app(&services))?;
    }

    let _session = TerminalSession::enter()?;
    let mut renderer = TerminalRenderer::new();
    let mut stdout = io::stdout();

    loop {
        services.resolve_pending();
        renderer.render(&doc.borrow(), container, &mut stdout)?;

        match poll_event(Duration::from_millis(50))? {
            Some(InputEvent::Key(key)) => {
                if route_key(&doc, &key)? == KeyOutcome::Quit {
                    break;
                }
            }
            Some(InputEvent::Resize(..)) => renderer.invalidate(),
            _ => {}
        }
    }

    tracing::info!(history = ?services.history.borrow(), "visited");
    Ok(())
}
