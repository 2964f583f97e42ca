//! Catalog configuration resolved from the environment.

use std::fmt;
use std::str::FromStr;

use crate::error::{RetailError, RetailResult};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const BASE_URL_VAR: &str = "RETAIL_API_URL";
pub const UPDATE_POLICY_VAR: &str = "RETAIL_UPDATE_POLICY";

/// When an edited product is written into the local list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdatePolicy {
    /// Apply on completion whatever the server answered. Failures are still
    /// reported to the caller.
    #[default]
    Optimistic,
    /// Apply only after a 2xx response.
    Confirmed,
}

impl FromStr for UpdatePolicy {
    type Err = RetailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "optimistic" => Ok(UpdatePolicy::Optimistic),
            "confirmed" => Ok(UpdatePolicy::Confirmed),
            other => Err(RetailError::config(format!("unknown update policy: {other}"))),
        }
    }
}

impl fmt::Display for UpdatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdatePolicy::Optimistic => f.write_str("optimistic"),
            UpdatePolicy::Confirmed => f.write_str("confirmed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub base_url: String,
    pub update_policy: UpdatePolicy,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            update_policy: UpdatePolicy::default(),
        }
    }
}

impl CatalogConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_update_policy(mut self, policy: UpdatePolicy) -> Self {
        self.update_policy = policy;
        self
    }

    /// Read `RETAIL_API_URL` and `RETAIL_UPDATE_POLICY`, falling back to
    /// defaults for unset variables.
    pub fn from_env() -> RetailResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> RetailResult<Self> {
        let base_url = lookup(BASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let update_policy = match lookup(UPDATE_POLICY_VAR) {
            Some(raw) => raw.parse()?,
            None => UpdatePolicy::default(),
        };
        Ok(Self {
            base_url,
            update_policy,
        })
    }
}
