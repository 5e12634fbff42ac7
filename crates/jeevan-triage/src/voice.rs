//! Black-box speech output used to read questions and outcomes aloud.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Languages the voice prompts are offered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    Punjabi,
    Hindi,
    English,
}

impl Language {
    pub const fn locale(self) -> &'static str {
        match self {
            Self::Punjabi => "pa-IN",
            Self::Hindi => "hi-IN",
            Self::English => "en-IN",
        }
    }

    pub const fn native_name(self) -> &'static str {
        match self {
            Self::Punjabi => "ਪੰਜਾਬੀ",
            Self::Hindi => "हिंदी",
            Self::English => "English",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Punjabi => "punjabi",
            Self::Hindi => "hindi",
            Self::English => "english",
        };
        f.write_str(name)
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "punjabi" | "pa" | "pa-in" => Ok(Self::Punjabi),
            "hindi" | "hi" | "hi-in" => Ok(Self::Hindi),
            "english" | "en" | "en-in" => Ok(Self::English),
            _ => Err(UnknownLanguage(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported voice language '{0}'")]
pub struct UnknownLanguage(pub String);

/// Text to be spoken along with the locale to speak it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Utterance {
    pub text: String,
    pub locale: &'static str,
}

impl Utterance {
    pub fn new(text: impl Into<String>, language: Language) -> Self {
        Self {
            text: text.into(),
            locale: language.locale(),
        }
    }
}

/// Fire-and-forget speech capability; there is no acknowledgement or retry.
pub trait Speaker: Send + Sync {
    fn speak(&self, utterance: &Utterance);
}
