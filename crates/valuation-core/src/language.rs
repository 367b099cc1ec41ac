//! Output language for prompts and reports

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages the prompts and report labels are written in
///
/// # Examples
///
/// ```
/// use valuation_core::Language;
///
/// assert_eq!(Language::from_code("pt-BR"), Some(Language::Portuguese));
/// assert_eq!(Language::Portuguese.code(), "pt");
/// assert_eq!(Language::from_code("ja"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Portuguese,
}

impl Language {
    /// ISO 639-1 language code
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Portuguese => "pt",
        }
    }

    /// Language name for display
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Portuguese => "Português",
        }
    }

    /// Parse from an ISO 639-1 code, a regional tag or a common name
    pub fn from_code(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        let primary = lower.split(['-', '_']).next().unwrap_or_default();
        match primary {
            "en" | "english" => Some(Language::English),
            "pt" | "portuguese" | "português" | "portugues" => Some(Language::Portuguese),
            _ => None,
        }
    }

    /// Pick the text for this language
    pub fn pick<'a>(&self, english: &'a str, portuguese: &'a str) -> &'a str {
        match self {
            Language::English => english,
            Language::Portuguese => portuguese,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_code(s).ok_or_else(|| format!("unsupported language: {s}"))
    }
}
