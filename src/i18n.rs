//! Localized string lookup for user-facing replies.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Language loaded when none is requested explicitly.
pub const DEFAULT_LANGUAGE: &str = "en";

const BUILTIN_EN: &str = include_str!("../locales/en.json");

#[derive(Debug, Error)]
pub enum I18nError {
    #[error("failed to read locale file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("locale file for '{language}' is not a valid string table")]
    Parse {
        language: String,
        #[source]
        source: serde_json::Error,
    },
    /// `change_language` needs a locale directory to load other languages
    /// from; a translator built purely from embedded strings has none.
    #[error("no locale directory configured to load language '{language}'")]
    NoLocaleDir { language: String },
}

/// Flat `key -> template` table for one language, with `{placeholder}`
/// substitution. Missing keys echo the key itself rather than failing, so a
/// gap in a translation never breaks a reply.
#[derive(Debug, Clone)]
pub struct Translator {
    locale_dir: Option<PathBuf>,
    language: String,
    strings: HashMap<String, String>,
}

impl Default for Translator {
    fn default() -> Self {
        Self::from_json(DEFAULT_LANGUAGE, BUILTIN_EN).expect("builtin locale table is valid JSON")
    }
}

impl Translator {
    /// Translator over the embedded English table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a string table directly, without a backing directory.
    pub fn from_json(language: impl Into<String>, json: &str) -> Result<Self, I18nError> {
        let language = language.into();
        let strings =
            serde_json::from_str(json).map_err(|source| I18nError::Parse {
                language: language.clone(),
                source,
            })?;
        Ok(Self {
            locale_dir: None,
            language,
            strings,
        })
    }

    /// Loads `<dir>/<language>.json` and remembers the directory so the
    /// language can be switched later.
    pub fn from_dir(dir: impl AsRef<Path>, language: impl Into<String>) -> Result<Self, I18nError> {
        let dir = dir.as_ref().to_path_buf();
        let language = language.into();
        let strings = Self::load_table(&dir, &language)?;
        Ok(Self {
            locale_dir: Some(dir),
            language,
            strings,
        })
    }

    fn load_table(dir: &Path, language: &str) -> Result<HashMap<String, String>, I18nError> {
        let path = dir.join(format!("{language}.json"));
        let raw = std::fs::read_to_string(&path).map_err(|source| I18nError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| I18nError::Parse {
            language: language.to_string(),
            source,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn is_current(&self, language: &str) -> bool {
        self.language == language
    }

    /// Switches to another language table. Switching to the current
    /// language is a no-op.
    pub fn change_language(&mut self, language: &str) -> Result<(), I18nError> {
        if self.is_current(language) {
            return Ok(());
        }
        let dir = self
            .locale_dir
            .as_deref()
            .ok_or_else(|| I18nError::NoLocaleDir {
                language: language.to_string(),
            })?;
        self.strings = Self::load_table(dir, language)?;
        self.language = language.to_string();
        Ok(())
    }

    /// Looks up `key` and substitutes `{name}` placeholders from `args`.
    /// Unknown keys come back verbatim.
    pub fn localised(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut text = self
            .strings
            .get(key)
            .map(String::as_str)
            .unwrap_or(key)
            .to_string();
        for (name, value) in args {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }
}
