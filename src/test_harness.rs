//! Shared fixtures for whitebox tests.
//!
//! [`Page`] is an in-memory document holding one accordion container plus a
//! virtual clock, with handles to every surface it built.
//! [`AcceptanceTestHarness`] drives the terminal demo through a `TestBackend`.

use crate::config::Options;
use crate::dom::Document;
use crate::handorgel::Handorgel;
use crate::model::{ControllerId, Event, EventKind, NodeId};
use crate::source::load_document;
use crate::surface::{Context, Surface};
use crate::timer::TimerQueue;
use crate::view::{AccordionStyles, ColorConfig, TuiApp, TuiError};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// `body > div.handorgel > (h3.handorgel__header > button, div.handorgel__content > p)*`
pub struct Page {
    pub doc: Document,
    pub timers: TimerQueue,
    pub container: NodeId,
    pub headers: Vec<NodeId>,
    pub buttons: Vec<NodeId>,
    pub contents: Vec<NodeId>,
}

impl Page {
    pub fn with_folds(count: usize) -> Self {
        let mut doc = Document::new();
        let root = doc.root();
        let container = doc.append_element(root, "div", &[("class", "handorgel")]);
        let mut page = Self {
            doc,
            timers: TimerQueue::new(),
            container,
            headers: Vec::new(),
            buttons: Vec::new(),
            contents: Vec::new(),
        };
        for _ in 0..count {
            page.add_fold();
        }
        page
    }

    /// Append one header/content pair. Returns its index.
    pub fn add_fold(&mut self) -> usize {
        let index = self.headers.len();
        let container = self.container;
        let header = self
            .doc
            .append_element(container, "h3", &[("class", "handorgel__header")]);
        let button = self.doc.append_element(header, "button", &[]);
        self.doc.append_text(button, &format!("Header {index}"));
        let content = self
            .doc
            .append_element(container, "div", &[("class", "handorgel__content")]);
        let body = self.doc.append_element(content, "p", &[]);
        self.doc.append_text(body, &format!("Content {index}"));

        self.headers.push(header);
        self.buttons.push(button);
        self.contents.push(content);
        index
    }

    /// Put the initial-open marker on header `index`.
    pub fn mark_open(&mut self, index: usize) {
        self.doc.set_attribute(self.headers[index], "data-open", "");
    }

    pub fn cx(&mut self) -> Context<'_> {
        Context::new(&mut self.doc, &mut self.timers)
    }

    /// Build a controller directly over the container.
    pub fn attach(&mut self, options: Options) -> Handorgel {
        let container = self.container;
        Handorgel::new(&mut self.cx(), container, ControllerId::numbered(1), options)
    }

    /// Advance the clock, delivering due timers to `controller`.
    pub fn advance(&mut self, controller: &mut Handorgel, millis: u64) {
        for timer in self.timers.advance(Duration::from_millis(millis)) {
            controller.fire_timer(&mut Context::new(&mut self.doc, &mut self.timers), timer);
        }
    }

    pub fn id_of(&self, node: NodeId) -> Option<String> {
        self.doc.attribute(node, "id")
    }
}

/// Options with every transition completing immediately.
pub fn instant() -> Options {
    Options {
        transition_duration: Duration::ZERO,
        initial_open_transition: false,
        ..Options::default()
    }
}

/// Record every event `controller` publishes.
pub fn record(controller: &mut Handorgel) -> Rc<RefCell<Vec<Event>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    controller.on_any(move |event| sink.borrow_mut().push(*event));
    log
}

/// Drain a recorder, keeping only the event kinds.
pub fn take_kinds(log: &Rc<RefCell<Vec<Event>>>) -> Vec<EventKind> {
    log.borrow_mut().drain(..).map(|event| event.kind).collect()
}

/// Convert a ratatui buffer to a string representation for snapshot testing.
///
/// Captures the visual output character by character, preserving layout.
/// Empty trailing lines are removed to keep snapshots clean.
pub fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    let area = buffer.area();
    let mut lines = Vec::new();

    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            let cell = &buffer[(x, y)];
            line.push_str(cell.symbol());
        }
        let trimmed = line.trim_end();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }

    lines.join("\n")
}

/// Test harness for acceptance testing
///
/// Wraps `TuiApp<TestBackend>` to provide a clean API for simulating user
/// interactions in acceptance tests. Colors are off so snapshots only see
/// text.
pub struct AcceptanceTestHarness {
    app: TuiApp<TestBackend>,
    running: bool,
}

impl AcceptanceTestHarness {
    /// Load a document fixture into a 60x16 terminal.
    pub fn from_fixture(path: &str, options: Options) -> Result<Self, TuiError> {
        Self::from_fixture_with_size(path, options, 60, 16)
    }

    pub fn from_fixture_with_size(
        path: &str,
        options: Options,
        width: u16,
        height: u16,
    ) -> Result<Self, TuiError> {
        let backend = TestBackend::new(width, height);
        let terminal = Terminal::new(backend)?;
        let document = load_document(path)?;
        let styles = AccordionStyles::with_color_config(ColorConfig::from_env_and_args(true));

        Ok(Self {
            app: TuiApp::with_terminal(terminal, &document, options, styles),
            running: true,
        })
    }

    /// Send a single key event. Returns whether the app quit.
    pub fn send_key(&mut self, key: KeyCode) -> bool {
        self.send_key_with_mods(key, KeyModifiers::NONE)
    }

    pub fn send_key_with_mods(&mut self, key: KeyCode, mods: KeyModifiers) -> bool {
        if !self.running {
            return true;
        }

        let quit = self.app.handle_key_test(KeyEvent::new(key, mods));
        if quit {
            self.running = false;
        }
        quit
    }

    /// Send keys in order, stopping early if one quits.
    pub fn send_keys(&mut self, keys: &[KeyCode]) {
        for key in keys {
            if self.send_key(*key) {
                break;
            }
        }
    }

    /// Advance the demo clock by `millis`. Returns how many timers fired.
    pub fn advance(&mut self, millis: u64) -> usize {
        self.app.tick_test(Duration::from_millis(millis))
    }

    pub fn controller(&self) -> &Handorgel {
        self.app
            .controller_test()
            .expect("demo attaches a controller")
    }

    /// Indices of the open folds.
    pub fn open_indices(&self) -> Vec<usize> {
        self.controller()
            .folds()
            .iter()
            .enumerate()
            .filter(|(_, fold)| fold.is_open())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Render the current frame to a string.
    pub fn render_to_string(&mut self) -> String {
        self.app
            .render_test()
            .expect("Rendering should succeed in test harness");

        let buffer = self.app.terminal().backend().buffer();
        buffer_to_string(buffer)
    }

    /// Left-click at the given cell. Renders first so header rows are known.
    pub fn click_at(&mut self, column: u16, row: u16) {
        if !self.running {
            return;
        }

        let _ = self.app.render_test();

        let mouse_event = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };
        self.app.handle_mouse_test(mouse_event);
    }
}
