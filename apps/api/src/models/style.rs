//! Style parameters for the cover letter: tone and length.
//!
//! Known values match case-insensitively. Blank values fall back to the
//! default. Anything else is kept verbatim and passed through into the
//! generation instruction as literal text; it is NOT validated against the
//! known set.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Tone {
    #[default]
    Professional,
    Friendly,
    Concise,
    /// Unrecognized input, carried as typed.
    Custom(String),
}

impl Tone {
    pub fn as_str(&self) -> &str {
        match self {
            Tone::Professional => "Professional",
            Tone::Friendly => "Friendly",
            Tone::Concise => "Concise",
            Tone::Custom(raw) => raw,
        }
    }

    /// Lower-cased text spliced into the system instruction.
    pub fn instruction_text(&self) -> String {
        self.as_str().to_lowercase()
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Tone::Custom(_))
    }
}

impl From<&str> for Tone {
    fn from(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" | "professional" => Tone::Professional,
            "friendly" => Tone::Friendly,
            "concise" => Tone::Concise,
            _ => Tone::Custom(trimmed.to_string()),
        }
    }
}

impl From<String> for Tone {
    fn from(raw: String) -> Self {
        Tone::from(raw.as_str())
    }
}

impl From<Tone> for String {
    fn from(tone: Tone) -> Self {
        tone.as_str().to_string()
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Length {
    Short,
    #[default]
    Medium,
    Long,
    /// Unrecognized input, carried as typed.
    Custom(String),
}

impl Length {
    pub fn as_str(&self) -> &str {
        match self {
            Length::Short => "Short",
            Length::Medium => "Medium",
            Length::Long => "Long",
            Length::Custom(raw) => raw,
        }
    }

    pub fn instruction_text(&self) -> String {
        self.as_str().to_lowercase()
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Length::Custom(_))
    }
}

impl From<&str> for Length {
    fn from(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "short" => Length::Short,
            "" | "medium" => Length::Medium,
            "long" => Length::Long,
            _ => Length::Custom(trimmed.to_string()),
        }
    }
}

impl From<String> for Length {
    fn from(raw: String) -> Self {
        Length::from(raw.as_str())
    }
}

impl From<Length> for String {
    fn from(length: Length) -> Self {
        length.as_str().to_string()
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
