//! Site languages
//!
//! The first path segment selects the language of a page (`/de/...`). Anything
//! unrecognised falls back to English.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages the site publishes in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English (default)
    #[default]
    En,
    /// German
    De,
    /// French
    Fr,
    /// Korean
    Ko,
    /// Spanish
    Es,
    /// Italian
    It,
    /// Japanese
    Jp,
    /// Brazilian Portuguese
    Br,
}

impl Language {
    /// All supported languages, in lookup order
    pub const ALL: [Language; 8] = [
        Language::En,
        Language::De,
        Language::Fr,
        Language::Ko,
        Language::Es,
        Language::It,
        Language::Jp,
        Language::Br,
    ];

    /// Resolve the language from a page path
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        path.split('/')
            .nth(1)
            .and_then(|seg| seg.parse().ok())
            .unwrap_or_default()
    }

    /// Path segment code
    #[inline]
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::De => "de",
            Language::Fr => "fr",
            Language::Ko => "ko",
            Language::Es => "es",
            Language::It => "it",
            Language::Jp => "jp",
            Language::Br => "br",
        }
    }

    /// Locale identifier used for storage keys and `og:locale`
    #[inline]
    #[must_use]
    pub fn locale(&self) -> &'static str {
        match self {
            Language::En => "en_US",
            Language::De => "de_DE",
            Language::Fr => "fr_FR",
            Language::Ko => "ko_KR",
            Language::Es => "es_ES",
            Language::It => "it_IT",
            Language::Jp => "ja_JP",
            Language::Br => "pt_BR",
        }
    }

    /// Language-dependent root path, e.g. `/en`
    #[inline]
    #[must_use]
    pub fn root_path(&self) -> String {
        format!("/{}", self.code())
    }

    /// Locale used to format dates on a page
    ///
    /// The UK and APAC landing pages use British ordering regardless of
    /// language.
    #[must_use]
    pub fn date_locale(&self, page_path: &str) -> &'static str {
        let page = page_name(page_path);
        if page == "uk" || page == "apac" {
            return "en-UK";
        }
        match self {
            Language::En => "en-US",
            Language::Br => "pt-BR",
            Language::Jp => "ja-JP",
            other => other.code(),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == s)
            .ok_or_else(|| format!("unsupported language: '{s}'"))
    }
}

/// Last path segment without its extension
#[must_use]
pub fn page_name(path: &str) -> &str {
    let last = path.rsplit('/').next().unwrap_or_default();
    last.split('.').next().unwrap_or_default()
}
