use crossterm::event::{Event, KeyEventKind, poll, read};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::{cursor, execute, queue, terminal};
use std::io::{self, Stdout, Write};
use std::time::Duration;

use crate::terminal::event::{HostKey, TerminalEvent};
use crate::terminal::viewport::truncate_to_width;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

/// Full-screen crossterm session. `leave` restores the terminal; dropping
/// without it restores on a best-effort basis.
pub struct Terminal {
    stdout: Stdout,
    size: Size,
    active: bool,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self {
            stdout: io::stdout(),
            size: Size { width, height },
            active: false,
        })
    }

    pub fn enter(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.stdout,
            terminal::EnterAlternateScreen,
            terminal::DisableLineWrap,
            cursor::Hide
        )?;
        self.active = true;
        Ok(())
    }

    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(
            self.stdout,
            cursor::Show,
            terminal::EnableLineWrap,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn poll(&self, timeout: Duration) -> io::Result<bool> {
        poll(timeout)
    }

    pub fn read_event(&mut self) -> io::Result<Option<TerminalEvent>> {
        match read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                Ok(Some(TerminalEvent::Key(HostKey::from(key))))
            }
            Event::Resize(width, height) => {
                self.size = Size { width, height };
                Ok(Some(TerminalEvent::Resize { width, height }))
            }
            _ => Ok(None),
        }
    }

    /// Redraws the whole screen: `header` on the first row, `body` below it,
    /// `footer` on the last row. Lines are cut to the terminal width.
    pub fn draw(&mut self, header: &str, body: &[String], footer: &str) -> io::Result<()> {
        let width = self.size.width as usize;
        let height = self.size.height;
        queue!(self.stdout, terminal::BeginSynchronizedUpdate)?;
        queue!(
            self.stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::All),
            SetAttribute(Attribute::Bold),
            Print(truncate_to_width(header, width)),
            SetAttribute(Attribute::Reset)
        )?;
        for (row, line) in body.iter().enumerate() {
            let y = row as u16 + 1;
            if y + 1 >= height {
                break;
            }
            queue!(
                self.stdout,
                cursor::MoveTo(0, y),
                Print(truncate_to_width(line, width))
            )?;
        }
        queue!(
            self.stdout,
            cursor::MoveTo(0, height.saturating_sub(1)),
            SetAttribute(Attribute::Dim),
            Print(truncate_to_width(footer, width)),
            SetAttribute(Attribute::Reset),
            terminal::EndSynchronizedUpdate
        )?;
        self.stdout.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}
