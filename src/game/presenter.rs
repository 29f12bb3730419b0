//=========================================================================
// Note Presenter
//=========================================================================
//
// Shows and hides the note panel and tracks whether a note is open.
//
// One presenter belongs to each level scene and is handed to the
// movement controller by `&mut`. Panel visibility always equals the
// open flag: both are only written together, in `display` and `close`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::io::Write;

use log::{info, warn};

//=== NotePanel ===========================================================

/// The UI primitive a presenter drives.
pub trait NotePanel: Send {
    fn set_text(&mut self, text: &str);
    fn set_visible(&mut self, visible: bool);
}

//--- TextPanel -----------------------------------------------------------

/// Headless panel that records its state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextPanel {
    text: String,
    visible: bool,
}

impl TextPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl NotePanel for TextPanel {
    fn set_text(&mut self, text: &str) {
        text.clone_into(&mut self.text);
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

//--- ConsolePanel --------------------------------------------------------

/// Panel that prints the note to stdout whenever it becomes visible or
/// its text changes while shown.
#[derive(Debug, Default)]
pub struct ConsolePanel {
    inner: TextPanel,
}

impl ConsolePanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        self.inner.text()
    }

    pub fn is_visible(&self) -> bool {
        self.inner.is_visible()
    }

    fn print(&self) {
        let mut out = std::io::stdout().lock();
        let result = writeln!(out, "\n┌─ note ─────────────────────────────")
            .and_then(|_| {
                self.inner
                    .text()
                    .lines()
                    .try_for_each(|line| writeln!(out, "│ {}", line))
            })
            .and_then(|_| writeln!(out, "└─ [Esc] close ──────────────────────"));

        if let Err(e) = result {
            warn!("Could not print note: {}", e);
        }
    }
}

impl NotePanel for ConsolePanel {
    fn set_text(&mut self, text: &str) {
        self.inner.set_text(text);
        if self.inner.is_visible() {
            self.print();
        }
    }

    fn set_visible(&mut self, visible: bool) {
        let was_visible = self.inner.is_visible();
        self.inner.set_visible(visible);
        if visible && !was_visible {
            self.print();
        }
    }
}

//=== NotePresenter =======================================================

/// Owns the note panel and the open flag.
#[derive(Debug)]
pub struct NotePresenter<P: NotePanel> {
    panel: P,
    open: bool,
}

impl<P: NotePanel> NotePresenter<P> {
    /// Wraps a panel. The panel starts hidden.
    pub fn new(mut panel: P) -> Self {
        panel.set_visible(false);
        Self { panel, open: false }
    }

    /// Shows `text`. While open, replaces the shown text.
    pub fn display(&mut self, text: &str) {
        self.panel.set_text(text);
        self.panel.set_visible(true);
        if !self.open {
            info!("Note opened");
        }
        self.open = true;
    }

    /// Hides the panel. No-op when already closed.
    pub fn close(&mut self) {
        if self.open {
            info!("Note closed");
        }
        self.open = false;
        self.panel.set_visible(false);
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }
}

impl<P: NotePanel + Default> Default for NotePresenter<P> {
    fn default() -> Self {
        Self::new(P::default())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
