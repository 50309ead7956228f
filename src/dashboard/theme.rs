//! Dashboard theme - named text styles on top of `colored`

use colored::{ColoredString, Colorize};

/// Style tag attached to a worker status label (`["bundling", "yellow"]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleTag {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Bold,
    Dim,
}

impl StyleTag {
    /// Parse a tag name. Unknown names fall back to `Dim`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "red" => Self::Red,
            "green" => Self::Green,
            "yellow" => Self::Yellow,
            "blue" => Self::Blue,
            "magenta" => Self::Magenta,
            "cyan" => Self::Cyan,
            "white" => Self::White,
            "bold" => Self::Bold,
            "dim" | "gray" | "grey" => Self::Dim,
            other => {
                tracing::debug!(tag = other, "unknown style tag, using dim");
                Self::Dim
            }
        }
    }

    pub fn apply(self, text: &str) -> ColoredString {
        match self {
            Self::Red => text.red(),
            Self::Green => text.green(),
            Self::Yellow => text.yellow(),
            Self::Blue => text.blue(),
            Self::Magenta => text.magenta(),
            Self::Cyan => text.cyan(),
            Self::White => text.white(),
            Self::Bold => text.bold(),
            Self::Dim => text.dimmed(),
        }
    }
}

/// Semantic styles used by the renderer.
pub struct Theme;

impl Theme {
    pub fn title(text: &str) -> ColoredString {
        text.bold()
    }

    pub fn muted(text: &str) -> ColoredString {
        text.dimmed()
    }

    pub fn success(text: &str) -> ColoredString {
        text.green()
    }

    pub fn error(text: &str) -> ColoredString {
        text.red()
    }

    pub fn url(text: &str) -> ColoredString {
        text.cyan().bold()
    }

    pub fn url_separator(text: &str) -> ColoredString {
        text.cyan()
    }

    pub fn emphasis(text: &str) -> ColoredString {
        text.bold()
    }

    pub fn section(text: &str) -> ColoredString {
        text.underline().bold()
    }

    pub fn error_section(text: &str) -> ColoredString {
        text.red().underline().bold()
    }

    pub fn success_section(text: &str) -> ColoredString {
        text.green().underline().bold()
    }
}
