//! Structured error types for the Affiche renderer.
//!
//! Only failures that stop a render live here. A missing font is not one of
//! them: the font layer substitutes the built-in face and logs a warning.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The unified error type returned by all public Affiche API functions.
#[derive(Debug, Error)]
pub enum AfficheError {
    /// A markup line could not be understood.
    #[error("line {line}: {message}")]
    Markup { line: usize, message: String },

    /// JSON input failed to parse as a valid Affiche document.
    #[error("failed to parse document: {source}{}", hint_suffix(.hint))]
    Json {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// An image source is missing, unreadable, or in an unsupported format.
    /// Layout cannot continue without the real dimensions, so this is fatal.
    #[error("failed to load image '{src}': {reason}")]
    Image { src: String, reason: String },

    /// The canvas leaves no usable area once margins are subtracted.
    #[error("invalid canvas geometry: {0}")]
    Geometry(String),

    /// An element carries a size that can't be laid out, such as a negative
    /// or non-finite length in a JSON document.
    #[error("element {index}: {message}")]
    InvalidElement { index: usize, message: String },

    #[error("failed to access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The finished canvas could not be encoded or written.
    #[error("failed to encode output: {0}")]
    Encode(String),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {hint}")
    }
}

impl AfficheError {
    pub(crate) fn markup(line: usize, message: impl Into<String>) -> Self {
        AfficheError::Markup {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn image(src: &str, reason: impl Into<String>) -> Self {
        AfficheError::Image {
            src: src.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for AfficheError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the poster document schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        AfficheError::Json { source: e, hint }
    }
}
