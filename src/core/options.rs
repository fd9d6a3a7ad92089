use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::controller::DEFAULT_PAGE_SIZE;
use crate::core::error::ConfigError;
use crate::core::scroll::{DEFAULT_THRESHOLD, validate_threshold};
use crate::core::window::WindowStrategy;

pub const DEFAULT_CONTAINER_HEIGHT: &str = "600px";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListOptions {
    #[serde(alias = "rows")]
    pub items_per_page: usize,
    pub threshold: f64,
    pub container_height: String,
    pub strategy: WindowStrategy,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            items_per_page: DEFAULT_PAGE_SIZE,
            threshold: DEFAULT_THRESHOLD,
            container_height: DEFAULT_CONTAINER_HEIGHT.to_string(),
            strategy: WindowStrategy::default(),
        }
    }
}

impl ListOptions {
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_yaml::from_str(source)?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(source)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.items_per_page == 0 {
            return Err(ConfigError::InvalidPageSize(self.items_per_page));
        }
        if !validate_threshold(self.threshold) {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        if !is_css_length(self.container_height.as_str()) {
            return Err(ConfigError::InvalidContainerHeight(
                self.container_height.clone(),
            ));
        }
        Ok(())
    }

    /// Container height in pixels when given in `px`.
    pub fn container_height_px(&self) -> Option<f64> {
        self.container_height
            .trim()
            .strip_suffix("px")
            .and_then(|value| value.trim().parse::<f64>().ok())
    }
}

fn is_css_length(value: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^\s*\d+(\.\d+)?\s*(px|%|vh|em|rem)\s*$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(value))
}
