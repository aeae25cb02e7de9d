use serde::Serialize;
use url::Url;

use crate::errors::AwxpilotError;

/// Environment variables the credentials are sourced from.
pub const USERNAME_ENV: &str = "AWXPILOT_USERNAME";
pub const PASSWORD_ENV: &str = "AWXPILOT_PASSWORD";

// Service-account defaults for the dev control plane, used when the
// environment variables are unset.
const DEFAULT_USERNAME: &str = "jenkins";
const DEFAULT_PASSWORD: &str = "dlswmd_1";

/// Names of the built-in environment profiles, in listing order.
pub const PROFILE_NAMES: [&str; 3] = ["dev", "stage", "prod"];

/// Caller-supplied inputs for one provisioning run. Immutable for the run.
#[derive(Debug, Clone)]
pub struct RunParameters {
    /// Displayed inventory-source name, also embedded in the source path
    pub app_name: String,
    /// Key into the environment-profile table
    pub profile: String,
    /// Free-text search term for the source-control project lookup
    pub project: String,
}

/// Environment-specific settings resolved from a profile name.
#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentProfile {
    /// Base URL of the AWX console, without a trailing slash
    pub target_url: String,
    /// Numeric id of the inventory the source is added under
    pub inventory_index: u32,
    /// Host-filter expression typed into the wizard
    pub host_filter: String,
}

impl EnvironmentProfile {
    /// Resolve a profile name to its environment settings.
    ///
    /// An unknown profile is a fatal configuration error, never retried.
    pub fn resolve(profile: &str) -> Result<Self, AwxpilotError> {
        let (target_url, inventory_index, host_filter) = match profile {
            "dev" => ("https://awx-dev.infra.wmp.local", 2, "name__icontains=dev"),
            "stage" => ("https://awx-stage.infra.wmp.local", 3, "name__icontains=stage"),
            "prod" => ("https://awx.infra.wmp.local", 4, "name__icontains=prod"),
            other => return Err(AwxpilotError::UnknownProfile(other.to_string())),
        };
        Self::new(target_url, inventory_index, host_filter)
    }

    /// Build a profile record from raw parts, validating the URL.
    pub fn new(
        target_url: &str,
        inventory_index: u32,
        host_filter: &str,
    ) -> Result<Self, AwxpilotError> {
        let parsed = Url::parse(target_url).map_err(|e| {
            AwxpilotError::Other(anyhow::anyhow!("invalid target URL '{target_url}': {e}"))
        })?;
        // Trailing slash is trimmed so deep links concatenate cleanly.
        let target_url = parsed.as_str().trim_end_matches('/').to_string();
        Ok(Self {
            target_url,
            inventory_index,
            host_filter: host_filter.to_string(),
        })
    }

    /// Deep-link URL of the "add inventory source" form, navigated to right
    /// after login instead of clicking through the menus.
    pub fn add_source_url(&self) -> String {
        format!(
            "{}/#/inventories/inventory/{}/sources/add",
            self.target_url, self.inventory_index
        )
    }
}

/// Login credentials for the AWX console.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Source credentials from the process environment, falling back to the
    /// dev service-account defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Credentials::from_env`] but with an injectable lookup, so
    /// the fallback logic is testable without mutating the environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            username: lookup(USERNAME_ENV).unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            password: lookup(PASSWORD_ENV).unwrap_or_else(|| DEFAULT_PASSWORD.to_string()),
        }
    }
}

/// Chrome startup flags for a provisioning run.
///
/// The list mirrors what the control plane is known to tolerate: no sandbox
/// (CI containers), no /dev/shm, no GPU, and a fixed window size so the
/// PatternFly layout renders the same controls in the same order everywhere.
pub fn chrome_args(headless: bool) -> Vec<String> {
    let mut args = vec![
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-gpu".to_string(),
        "--window-size=1920,1080".to_string(),
    ];
    if headless {
        args.push("--headless=new".to_string());
    }
    args
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
