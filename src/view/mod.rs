//! Terminal demo: one accordion rendered with ratatui.
//!
//! The demo plays the host. It owns the document, the clock and the
//! registry, translates terminal input into surface input events and draws
//! whatever classes the folds leave on the document.

mod accordion;
mod styles;

pub use accordion::{accordion_lines, AccordionLines};
pub use styles::{AccordionStyles, ColorConfig, HeaderState};

use crate::config::{to_key_press, KeyBindings, Options};
use crate::dom::Document;
use crate::handorgel::{Handorgel, Registry};
use crate::model::{FocusTarget, InputEvent, KeyAction, NodeId};
use crate::source::{load_document, AccordionDocument, DocumentError};
use crate::surface::Context;
use crate::timer::TimerQueue;
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Layout},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use std::io::{self, Stdout};
use std::path::Path;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

/// Poll interval while a transition is pending.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
/// Poll interval when nothing is animating.
const IDLE_INTERVAL: Duration = Duration::from_millis(250);

const HELP_LINE: &str = " Tab focus  Enter toggle  ↑↓ Home End move  q quit";

/// Errors that can occur in the TUI
#[derive(Debug, Error)]
pub enum TuiError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Main TUI application.
pub struct TuiApp<B: Backend> {
    terminal: Terminal<B>,
    doc: Document,
    timers: TimerQueue,
    registry: Registry,
    container: NodeId,
    key_bindings: KeyBindings,
    styles: AccordionStyles,
    /// `(screen row, header button)` from the last draw, for mouse hits.
    header_rows: Vec<(u16, NodeId)>,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Set up the terminal in raw mode with an alternate screen and attach
    /// the accordion.
    pub fn new(document: &AccordionDocument, options: Options) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(crossterm::event::EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self::with_terminal(
            terminal,
            document,
            options,
            AccordionStyles::new(),
        ))
    }

    /// Run the event loop until the user quits.
    ///
    /// The virtual clock follows wall time, so transitions take as long as
    /// configured.
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.draw()?;
        let mut last_tick = Instant::now();

        loop {
            let interval = if self.timers.pending_count() > 0 {
                FRAME_INTERVAL
            } else {
                IDLE_INTERVAL
            };

            let mut dirty = false;
            if event::poll(interval)? {
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key(key) {
                            return Ok(());
                        }
                        dirty = true;
                    }
                    Event::Mouse(mouse) => {
                        self.handle_mouse(mouse);
                        dirty = true;
                    }
                    Event::Resize(_, _) => dirty = true,
                    _ => {}
                }
            }

            let now = Instant::now();
            if self.tick(now.duration_since(last_tick)) > 0 {
                dirty = true;
            }
            last_tick = now;

            if dirty {
                self.draw()?;
            }
        }
    }
}

impl<B: Backend> TuiApp<B> {
    /// Build the document, attach a controller to it and disable the folds
    /// the document marks disabled.
    pub fn with_terminal(
        terminal: Terminal<B>,
        document: &AccordionDocument,
        options: Options,
        styles: AccordionStyles,
    ) -> Self {
        let mut doc = Document::new();
        let root = doc.root();
        let built = document.build(&mut doc, root);
        let mut timers = TimerQueue::new();
        let mut registry = Registry::new();

        {
            let mut cx = Context::new(&mut doc, &mut timers);
            let controller = registry.attach(&mut cx, built.container, options);
            for index in document.disabled_indices() {
                controller.disable(&mut cx, index);
            }
            controller.on_any(|event| match event.fold {
                Some(fold) => debug!(event = %event.kind, %fold, "accordion event"),
                None => debug!(event = %event.kind, "accordion event"),
            });
            info!(
                controller = %controller.id(),
                folds = controller.len(),
                "accordion attached"
            );
        }

        Self {
            terminal,
            doc,
            timers,
            registry,
            container: built.container,
            key_bindings: KeyBindings::default(),
            styles,
            header_rows: Vec::new(),
        }
    }

    fn controller(&self) -> Option<&Handorgel> {
        self.registry.get(self.container)
    }

    /// Header button of the focused fold.
    fn focused_button(&self) -> Option<NodeId> {
        let controller = self.controller()?;
        let index = controller.focused_index()?;
        controller.fold(index).map(|fold| fold.button())
    }

    /// Advance the clock, firing due transitions. Returns how many fired.
    fn tick(&mut self, elapsed: Duration) -> usize {
        self.registry.advance(&mut self.doc, &mut self.timers, elapsed)
    }

    fn dispatch(&mut self, node: NodeId, event: InputEvent) {
        let mut cx = Context::new(&mut self.doc, &mut self.timers);
        let outcome = self.registry.dispatch(&mut cx, node, event);
        debug!(node = %node, ?event, ?outcome, "input dispatched");
    }

    /// Handle a single keyboard event.
    ///
    /// Returns true if the app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }

        match self.key_bindings.get(key) {
            Some(KeyAction::Quit) => return true,
            Some(KeyAction::FocusNext) => self.move_focus(FocusTarget::Next),
            Some(KeyAction::FocusPrev) => self.move_focus(FocusTarget::Prev),
            Some(KeyAction::Activate) => {
                if let Some(button) = self.focused_button() {
                    self.dispatch(button, InputEvent::Click);
                }
            }
            None => {
                if let Some(button) = self.focused_button() {
                    self.dispatch(button, InputEvent::KeyDown(to_key_press(key)));
                }
            }
        }
        false
    }

    fn move_focus(&mut self, target: FocusTarget) {
        let mut cx = Context::new(&mut self.doc, &mut self.timers);
        if let Some(controller) = self.registry.get_mut(self.container) {
            controller.focus(&mut cx, target);
        }
    }

    /// A left click on a header row focuses and activates its button.
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let hit = self
            .header_rows
            .iter()
            .find(|(row, _)| *row == mouse.row)
            .map(|&(_, button)| button);
        if let Some(button) = hit {
            self.dispatch(button, InputEvent::Focus);
            self.dispatch(button, InputEvent::Click);
        }
    }

    /// Render the accordion and the help line.
    fn draw(&mut self) -> Result<(), TuiError> {
        let Some(controller) = self.registry.get(self.container) else {
            return Ok(());
        };
        let doc = &self.doc;
        let styles = &self.styles;
        let mut header_rows = Vec::new();

        self.terminal.draw(|frame| {
            let [main, help] =
                Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());
            let block = Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", controller.id()));
            let inner = block.inner(main);
            let layout = accordion_lines(doc, controller, styles, inner.width);

            header_rows = layout
                .headers
                .iter()
                .filter_map(|&(line, button)| {
                    let row = inner.y.checked_add(u16::try_from(line).ok()?)?;
                    (row < inner.bottom()).then_some((row, button))
                })
                .collect();

            let body = if layout.lines.is_empty() {
                vec![Line::styled(
                    "  (no folds)",
                    Style::default().add_modifier(Modifier::DIM),
                )]
            } else {
                layout.lines
            };
            frame.render_widget(Paragraph::new(body).block(block), main);
            frame.render_widget(
                Paragraph::new(HELP_LINE).style(Style::default().add_modifier(Modifier::DIM)),
                help,
            );
        })?;

        self.header_rows = header_rows;
        Ok(())
    }
}

// ===== Test Helpers =====

#[cfg(test)]
impl<B: Backend> TuiApp<B> {
    pub(crate) fn handle_key_test(&mut self, key: KeyEvent) -> bool {
        self.handle_key(key)
    }

    pub(crate) fn handle_mouse_test(&mut self, mouse: MouseEvent) {
        self.handle_mouse(mouse)
    }

    pub(crate) fn render_test(&mut self) -> Result<(), TuiError> {
        self.draw()
    }

    pub(crate) fn tick_test(&mut self, elapsed: Duration) -> usize {
        self.tick(elapsed)
    }

    pub(crate) fn controller_test(&self) -> Option<&Handorgel> {
        self.controller()
    }

    pub(crate) fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

/// Load `path`, run the demo on it and restore the terminal afterwards.
///
/// Logging must be initialized by the caller.
pub fn run_document(path: &Path, options: Options) -> Result<(), TuiError> {
    let document = load_document(path)?;
    info!(path = %path.display(), folds = document.folds.len(), "document loaded");

    let mut app = TuiApp::new(&document, options)?;

    // Run the app and ensure cleanup happens even on error
    let result = app.run();

    restore_terminal()?;

    result
}

fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(crossterm::event::DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
