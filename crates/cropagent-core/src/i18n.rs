//! Translation lookup for the strings this layer renders itself.
//!
//! The dashboard's full string tables live outside this crate; they are
//! injected through [`Translations`]. `StaticTranslations` covers only the
//! handful of chat strings the session layer produces.

use crate::selection::Language;

/// Key of the agent reply text used when a report has no summary.
pub const CHAT_FALLBACK_REPLY: &str = "chat.fallback_reply";
/// Key of the one-line notice appended when a chat request fails.
pub const CHAT_REQUEST_FAILED: &str = "chat.request_failed";
/// Key of the greeting shown in an empty timeline.
pub const CHAT_WELCOME: &str = "chat.welcome";

/// Injected lookup keyed by language code.
pub trait Translations: Send + Sync {
    fn lookup(&self, language: Language, key: &str) -> Option<&str>;

    /// Looks up `key`, falling back to English, then to the key itself.
    fn text<'a>(&'a self, language: Language, key: &'a str) -> &'a str {
        self.lookup(language, key)
            .or_else(|| self.lookup(Language::En, key))
            .unwrap_or(key)
    }
}

/// Built-in table for the session layer's own strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticTranslations;

impl Translations for StaticTranslations {
    fn lookup(&self, language: Language, key: &str) -> Option<&str> {
        let text = match (key, language) {
            (CHAT_FALLBACK_REPLY, Language::En) => "Here is the latest analysis for your crop.",
            (CHAT_FALLBACK_REPLY, Language::Hi) => "आपकी फसल का नवीनतम विश्लेषण यहाँ है।",
            (CHAT_FALLBACK_REPLY, Language::Mr) => "तुमच्या पिकाचे नवीनतम विश्लेषण येथे आहे.",
            (CHAT_REQUEST_FAILED, Language::En) => "Sorry, I could not reach the analysis service. Please try again.",
            (CHAT_REQUEST_FAILED, Language::Hi) => "क्षमा करें, विश्लेषण सेवा से संपर्क नहीं हो सका। कृपया पुनः प्रयास करें।",
            (CHAT_REQUEST_FAILED, Language::Mr) => "क्षमस्व, विश्लेषण सेवेशी संपर्क होऊ शकला नाही. कृपया पुन्हा प्रयत्न करा.",
            (CHAT_WELCOME, Language::En) => "Hello! Ask me about yield, weather, soil or irrigation for your crop.",
            (CHAT_WELCOME, Language::Hi) => "नमस्ते! अपनी फसल की उपज, मौसम, मिट्टी या सिंचाई के बारे में पूछें।",
            (CHAT_WELCOME, Language::Mr) => "नमस्कार! तुमच्या पिकाचे उत्पादन, हवामान, माती किंवा सिंचन याबद्दल विचारा.",
            _ => return None,
        };
        Some(text)
    }
}
