//! Response languages supported by the analysis backend.

use crate::error::{CropAgentError, Result};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Language the backend formats its report in.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    /// English
    #[default]
    En,
    /// Hindi
    Hi,
    /// Marathi
    Mr,
}

impl Language {
    /// Parses a wire code (`"en"`, `"hi"`, `"mr"`).
    pub fn parse(code: &str) -> Result<Self> {
        code.trim()
            .to_ascii_lowercase()
            .parse()
            .map_err(|_| CropAgentError::UnsupportedLanguage(code.to_string()))
    }

    /// Wire code sent in requests.
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Mr => "mr",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_parse_codes() {
        assert_eq!(Language::parse("hi").unwrap(), Language::Hi);
        assert_eq!(Language::parse(" MR ").unwrap(), Language::Mr);
        assert!(matches!(
            Language::parse("fr"),
            Err(CropAgentError::UnsupportedLanguage(_))
        ));
    }

    #[test]
    fn test_display_matches_wire_code() {
        for lang in Language::iter() {
            assert_eq!(lang.to_string(), lang.code());
            assert_eq!(
                serde_json::to_string(&lang).unwrap(),
                format!("\"{}\"", lang.code())
            );
        }
    }
}
