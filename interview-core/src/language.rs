use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PanelError;

/// Languages offered in the editor's language picker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Cpp,
    Python,
    Java,
    JavaScript,
}

impl Language {
    /// Picker order.
    pub const ALL: [Language; 4] = [
        Language::Cpp,
        Language::Python,
        Language::Java,
        Language::JavaScript,
    ];

    /// Internal identifier, also what the execution client maps from.
    pub fn id(self) -> &'static str {
        match self {
            Language::Cpp => "cpp",
            Language::Python => "python",
            Language::Java => "java",
            Language::JavaScript => "javascript",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::Cpp => "C++",
            Language::Python => "Python",
            Language::Java => "Java",
            Language::JavaScript => "JavaScript",
        }
    }

    /// Syntax mode the editor widget should load.
    pub fn syntax_mode(self) -> &'static str {
        self.id()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Language {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Language::ALL
            .into_iter()
            .find(|l| l.id() == wanted || l.label().to_lowercase() == wanted)
            .ok_or_else(|| PanelError::UnknownLanguage(s.to_string()))
    }
}
