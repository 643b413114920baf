//! User-facing notifications.
//!
//! The session recorder reports outcomes through this seam: one success
//! message per recorded session and one error message per persistence
//! failure. The terminal implementation writes to stderr so it never
//! mixes with command output on stdout.

use colored::Colorize;

/// Sink for short user-facing messages.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier {
    /// Report a success.
    fn success(&self, message: &str);

    /// Report a failure.
    fn error(&self, message: &str);
}

/// Notifier that prints colored messages to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn success(&self, message: &str) {
        eprintln!("{} {message}", "✓".green().bold());
    }

    fn error(&self, message: &str) {
        eprintln!("{} {message}", "✗".red().bold());
    }
}

/// Notifier that silently discards messages (JSON output mode).
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn success(&self, _message: &str) {}

    fn error(&self, _message: &str) {}
}
