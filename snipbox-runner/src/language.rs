//! Supported snippet languages and their runner file conventions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A language the external runner knows how to compile and run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Language {
    JavaScript,
    Python,
    Java,
    Cpp,
    C,
}

impl Language {
    /// Every supported language.
    pub const ALL: [Language; 5] = [
        Language::JavaScript,
        Language::Python,
        Language::Java,
        Language::Cpp,
        Language::C,
    ];

    /// Identifier sent to the runner and accepted from clients.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::C => "c",
        }
    }

    /// File name the runner expects for a single-file submission.
    ///
    /// Java requires the public class and the file to share a name, so the
    /// snippet must declare `class Main`.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Language::JavaScript => "main.js",
            Language::Python => "main.py",
            Language::Java => "Main.java",
            Language::Cpp => "main.cpp",
            Language::C => "main.c",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a language name is not in [`Language::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language '{0}'")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.as_str() == wanted)
            .ok_or_else(|| UnknownLanguage(s.to_owned()))
    }
}
