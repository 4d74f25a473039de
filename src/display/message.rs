use colored::{Color, Colorize};

/// Prefix of every status line the client prints
pub const LEADING_MARK: &str = "==>";

/// Kind of message, deciding its prefix and colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Warning,
    Error,
    Info,
}

impl MessageKind {
    fn label(self) -> &'static str {
        match self {
            MessageKind::Success => "SUCCESS",
            MessageKind::Warning => "WARNING",
            MessageKind::Error => "ERROR",
            MessageKind::Info => "",
        }
    }

    fn color(self) -> Color {
        match self {
            MessageKind::Success => Color::Green,
            MessageKind::Warning => Color::Yellow,
            MessageKind::Error => Color::Red,
            MessageKind::Info => Color::White,
        }
    }
}

/// Format a message with the `==> KIND:` prefix.
///
/// Indented messages use a `  -> KIND:` prefix and belong under a previous line.
pub fn format_message(message: &str, kind: MessageKind, indented: bool) -> String {
    let mark = if indented { "  ->" } else { LEADING_MARK };
    let prefix = match kind {
        MessageKind::Info => format!("{mark} "),
        _ => format!("{mark} {}: ", kind.label()),
    };
    format!("{}{}", prefix.color(kind.color()).bold(), message)
}

/// Print a formatted message; errors and warnings go to stderr
pub fn display_message(message: &str, kind: MessageKind, indented: bool) {
    let line = format_message(message, kind, indented);
    match kind {
        MessageKind::Error | MessageKind::Warning => eprintln!("{line}"),
        MessageKind::Success | MessageKind::Info => println!("{line}"),
    }
}

/// Colour associated with a run or job status
pub fn status_color(status: &str) -> Color {
    match status {
        "finished" => Color::Green,
        "failed" => Color::Red,
        "running" => Color::BrightBlue,
        "stopped" => Color::Yellow,
        "queued" | "pending" => Color::BrightYellow,
        "deleted" => Color::BrightBlack,
        _ => Color::White,
    }
}
