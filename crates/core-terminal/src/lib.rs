//! Terminal backend abstraction and crossterm implementation.
//!
//! A backend owns the device state the renderer does not touch: raw versus
//! cooked line discipline, the alternate screen, the cursor's visibility on
//! exit, the window title and the size query. [`TerminalGuard`] restores
//! the device when dropped, including during a panic unwind.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode,
        enable_raw_mode,
    },
};
use std::io::stdout;
use std::ops::{Deref, DerefMut};
use tracing::{debug, warn};

/// Line discipline of the controlling terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminalMode {
    /// Every keypress is delivered immediately, without echo.
    #[default]
    Raw,
    /// Input is echoed and delivered a line at a time.
    Cooked,
}

impl TerminalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminalMode::Raw => "raw",
            TerminalMode::Cooked => "cooked",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            TerminalMode::Raw => TerminalMode::Cooked,
            TerminalMode::Cooked => TerminalMode::Raw,
        }
    }
}

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
    /// `(columns, rows)`.
    fn size(&self) -> Result<(u16, u16)>;
    fn mode(&self) -> TerminalMode;
    fn set_mode(&mut self, mode: TerminalMode) -> Result<()>;

    /// Flip between raw and cooked, returning the new mode.
    fn switch_mode(&mut self) -> Result<TerminalMode> {
        let next = self.mode().toggled();
        self.set_mode(next)?;
        Ok(next)
    }

    /// Enter and return a guard that will leave on drop.
    fn enter_guard(&mut self) -> Result<TerminalGuard<'_, Self>>
    where
        Self: Sized,
    {
        self.enter()?;
        Ok(TerminalGuard {
            backend: self,
            active: true,
        })
    }
}

pub struct CrosstermBackend {
    entered: bool,
    mode: TerminalMode,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self::with_mode(TerminalMode::Raw)
    }

    /// Backend that starts in `mode` once entered.
    pub fn with_mode(mode: TerminalMode) -> Self {
        Self {
            entered: false,
            mode,
        }
    }

    fn apply_mode(mode: TerminalMode) -> Result<()> {
        match mode {
            TerminalMode::Raw => {
                enable_raw_mode()?;
                execute!(stdout(), Hide)?;
            }
            TerminalMode::Cooked => {
                disable_raw_mode()?;
                execute!(stdout(), Show)?;
            }
        }
        Ok(())
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            execute!(stdout(), EnterAlternateScreen, Clear(ClearType::All))?;
            Self::apply_mode(self.mode)?;
            self.entered = true;
            debug!(target: "terminal", mode = self.mode.as_str(), "terminal_entered");
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            execute!(stdout(), LeaveAlternateScreen, Show)?;
            disable_raw_mode()?;
            self.entered = false;
            debug!(target: "terminal", "terminal_left");
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(stdout(), SetTitle(title))?;
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16)> {
        Ok(crossterm::terminal::size()?)
    }

    fn mode(&self) -> TerminalMode {
        self.mode
    }

    fn set_mode(&mut self, mode: TerminalMode) -> Result<()> {
        if self.entered && mode != self.mode {
            Self::apply_mode(mode)?;
        }
        debug!(target: "terminal", from = self.mode.as_str(), to = mode.as_str(), "mode_changed");
        self.mode = mode;
        Ok(())
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        if let Err(err) = self.leave() {
            warn!(target: "terminal", error = %err, "terminal_restore_failed");
        }
    }
}

/// Backend for runs without a controlling terminal: fixed size, mode
/// changes are only recorded.
#[derive(Debug, Clone)]
pub struct HeadlessBackend {
    size: (u16, u16),
    mode: TerminalMode,
    entered: bool,
    title: Option<String>,
}

impl HeadlessBackend {
    /// `(columns, rows)`.
    pub fn new(columns: u16, rows: u16) -> Self {
        Self {
            size: (columns, rows),
            mode: TerminalMode::Raw,
            entered: false,
            title: None,
        }
    }

    pub fn is_entered(&self) -> bool {
        self.entered
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_size(&mut self, columns: u16, rows: u16) {
        self.size = (columns, rows);
    }
}

impl TerminalBackend for HeadlessBackend {
    fn enter(&mut self) -> Result<()> {
        self.entered = true;
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        self.entered = false;
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        self.title = Some(title.to_string());
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16)> {
        Ok(self.size)
    }

    fn mode(&self) -> TerminalMode {
        self.mode
    }

    fn set_mode(&mut self, mode: TerminalMode) -> Result<()> {
        self.mode = mode;
        Ok(())
    }
}

/// RAII guard ensuring terminal state restoration even if caller early-returns or panics.
pub struct TerminalGuard<'a, B: TerminalBackend> {
    backend: &'a mut B,
    active: bool,
}

impl<B: TerminalBackend> TerminalGuard<'_, B> {
    /// Leave now instead of on drop, reporting any failure.
    pub fn release(mut self) -> Result<()> {
        self.active = false;
        self.backend.leave()
    }
}

impl<B: TerminalBackend> Deref for TerminalGuard<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.backend
    }
}

impl<B: TerminalBackend> DerefMut for TerminalGuard<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        self.backend
    }
}

impl<B: TerminalBackend> Drop for TerminalGuard<'_, B> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.backend.leave();
        }
    }
}
