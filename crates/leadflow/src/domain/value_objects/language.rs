//! Language - Supported Lead Locales
//!
//! The fixed set of languages leads arrive in and agents are staffed for.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::EngineError;

/// Supported lead languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Es,
    Fr,
    De,
    Nl,
    Fi,
    Pl,
    Sv,
    Da,
    Hu,
}

impl Language {
    pub const ALL: [Language; 10] = [
        Language::En,
        Language::Es,
        Language::Fr,
        Language::De,
        Language::Nl,
        Language::Fi,
        Language::Pl,
        Language::Sv,
        Language::Da,
        Language::Hu,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
            Language::Nl => "nl",
            Language::Fi => "fi",
            Language::Pl => "pl",
            Language::Sv => "sv",
            Language::Da => "da",
            Language::Hu => "hu",
        }
    }

    /// Flag emoji used in notification titles
    pub fn flag(&self) -> &'static str {
        match self {
            Language::En => "🇬🇧",
            Language::Es => "🇪🇸",
            Language::Fr => "🇫🇷",
            Language::De => "🇩🇪",
            Language::Nl => "🇳🇱",
            Language::Fi => "🇫🇮",
            Language::Pl => "🇵🇱",
            Language::Sv => "🇸🇪",
            Language::Da => "🇩🇰",
            Language::Hu => "🇭🇺",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            "fr" => Ok(Language::Fr),
            "de" => Ok(Language::De),
            "nl" => Ok(Language::Nl),
            "fi" => Ok(Language::Fi),
            "pl" => Ok(Language::Pl),
            "sv" => Ok(Language::Sv),
            "da" => Ok(Language::Da),
            "hu" => Ok(Language::Hu),
            other => Err(EngineError::Validation(format!(
                "Unsupported language: {other}"
            ))),
        }
    }
}
