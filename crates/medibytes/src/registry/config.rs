use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::matching::CompatibilityWeights;

/// Registry settings: the scoring weight table plus presentation and paging defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatchingConfig")]
pub struct MatchingConfig {
    pub weights: CompatibilityWeights,
    /// Base URL prepended to clearance-certificate content identifiers.
    pub content_gateway: String,
    pub search_limit: usize,
}

impl MatchingConfig {
    pub const DEFAULT_CONTENT_GATEWAY: &'static str = "https://gateway.pinata.cloud/ipfs";
    pub const DEFAULT_SEARCH_LIMIT: usize = 50;
    pub const SEARCH_LIMIT_RANGE: RangeInclusive<usize> = 1..=100;

    pub fn clearance_url(&self, content_id: &str) -> String {
        format!("{}/{}", self.content_gateway, content_id)
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            weights: CompatibilityWeights::STANDARD,
            content_gateway: Self::DEFAULT_CONTENT_GATEWAY.to_string(),
            search_limit: Self::DEFAULT_SEARCH_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatchingConfigError {
    #[error("search limit must be between 1 and 100 (got {0})")]
    InvalidSearchLimit(usize),
}

#[derive(Deserialize)]
struct RawMatchingConfig {
    #[serde(default)]
    weights: CompatibilityWeights,
    #[serde(default = "default_content_gateway")]
    content_gateway: String,
    #[serde(default = "default_search_limit")]
    search_limit: usize,
}

fn default_content_gateway() -> String {
    MatchingConfig::DEFAULT_CONTENT_GATEWAY.to_string()
}

fn default_search_limit() -> usize {
    MatchingConfig::DEFAULT_SEARCH_LIMIT
}

impl TryFrom<RawMatchingConfig> for MatchingConfig {
    type Error = MatchingConfigError;

    fn try_from(raw: RawMatchingConfig) -> Result<Self, Self::Error> {
        if !Self::SEARCH_LIMIT_RANGE.contains(&raw.search_limit) {
            return Err(MatchingConfigError::InvalidSearchLimit(raw.search_limit));
        }

        Ok(Self {
            weights: raw.weights,
            content_gateway: raw.content_gateway.trim_end_matches('/').to_string(),
            search_limit: raw.search_limit,
        })
    }
}
