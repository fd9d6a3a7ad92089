use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMatchMode {
    #[default]
    Contains,
    StartsWith,
    Equals,
    Regex,
}

#[derive(Debug, Clone)]
pub(super) enum Matcher {
    All,
    Text { needle: String, mode: FilterMatchMode },
    Pattern(Regex),
}

impl Matcher {
    pub(super) fn compile(query: &str, mode: FilterMatchMode) -> Result<Self, ConfigError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Self::All);
        }
        if mode == FilterMatchMode::Regex {
            let pattern = RegexBuilder::new(query).case_insensitive(true).build()?;
            return Ok(Self::Pattern(pattern));
        }
        Ok(Self::Text {
            needle: query.to_lowercase(),
            mode,
        })
    }

    pub(super) fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    pub(super) fn matches(&self, text: &str) -> bool {
        match self {
            Self::All => true,
            Self::Pattern(pattern) => pattern.is_match(text),
            Self::Text { needle, mode } => {
                let haystack = text.to_lowercase();
                match mode {
                    FilterMatchMode::StartsWith => haystack.starts_with(needle.as_str()),
                    FilterMatchMode::Equals => haystack == *needle,
                    FilterMatchMode::Contains | FilterMatchMode::Regex => {
                        haystack.contains(needle.as_str())
                    }
                }
            }
        }
    }
}
