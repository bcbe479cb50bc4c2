//! Fixed-width table rendering and the line sinks it is written to.

use std::io::Write;
use std::sync::Mutex;

/// Column width used by the `users` command.
pub const DEFAULT_COLUMN_WIDTH: usize = 40;

/// Renders one account per line: padded username, padded user id, then the roles.
#[derive(Clone, Copy, Debug)]
pub struct RolePrinter {
    width: usize,
}

impl Default for RolePrinter {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMN_WIDTH)
    }
}

impl RolePrinter {
    /// Widths below 2 leave no room for the clip marker and are raised to 2.
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(2),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Pad `s` with trailing spaces to exactly `width` characters. Values that do not fit
    /// are clipped to `width - 2` characters followed by two spaces, so a value of exactly
    /// `width` characters is clipped too and columns always stay separated.
    pub fn pad(&self, s: &str) -> String {
        let len = s.chars().count();
        if len < self.width {
            let mut out = String::with_capacity(s.len() + self.width - len);
            out.push_str(s);
            out.extend(std::iter::repeat_n(' ', self.width - len));
            out
        } else {
            let mut out: String = s.chars().take(self.width - 2).collect();
            out.push_str("  ");
            out
        }
    }

    pub fn header(&self) -> String {
        format!("{} {} ROLES", self.pad("USER"), self.pad("USER ID"))
    }

    /// Roles are kept in resolution order.
    pub fn format(&self, username: &str, user_id: &str, roles: &[String]) -> String {
        format!(
            "{} {} {}",
            self.pad(username),
            self.pad(user_id),
            roles.join(" ")
        )
    }
}

/// Destination for rendered lines. Shared by every worker, so each call must write a
/// whole line atomically.
pub trait LineSink: Send + Sync {
    fn write_line(&self, line: &str) -> std::io::Result<()>;
}

/// Writes to standard output, holding the stdout lock for the duration of one line.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutSink;

impl LineSink for StdoutSink {
    fn write_line(&self, line: &str) -> std::io::Result<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{line}")
    }
}

/// Collects lines in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl LineSink for MemorySink {
    fn write_line(&self, line: &str) -> std::io::Result<()> {
        let mut lines = self
            .lines
            .lock()
            .map_err(|_| std::io::Error::other("output buffer poisoned"))?;
        lines.push(line.to_string());
        Ok(())
    }
}
