//! Cargo-style status lines on stderr, e.g. `    Resolved 4 packages`.

use std::io::Write;

use console::Style;

/// Colour of the status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Work that finished normally (bold green).
    Done,
    /// Something the user should look at (bold yellow).
    Warning,
}

impl StatusKind {
    pub fn style(self) -> Style {
        let style = Style::new().for_stderr().bold();
        match self {
            StatusKind::Done => style.green(),
            StatusKind::Warning => style.yellow(),
        }
    }
}

/// Format one status line: `label` right-aligned to 12 columns in `style`,
/// then `message` unstyled.
pub fn status_line(style: &Style, label: &str, message: &str) -> String {
    format!("{:>12} {message}", style.apply_to(label))
}

fn emit(kind: StatusKind, label: &str, message: &str) {
    let line = status_line(&kind.style(), label, message);
    let _ = writeln!(std::io::stderr(), "{line}");
}

pub fn status(label: &str, message: &str) {
    emit(StatusKind::Done, label, message);
}

pub fn status_warn(label: &str, message: &str) {
    emit(StatusKind::Warning, label, message);
}
