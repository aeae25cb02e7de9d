//! The authenticated UI workflow: login stage, wizard steps, and the runner
//! that sequences them over one browser session.

mod login;
mod wizard;

pub use login::AuthenticationStage;
pub use wizard::{InventoryWizard, source_path};

use anyhow::Result;
use tracing::{error, info, warn};

use crate::config::{Credentials, EnvironmentProfile, RunParameters};
use crate::errors::AwxpilotError;
use crate::session::BrowserSession;

/// Sequences authentication and the wizard over one [`BrowserSession`],
/// classifies the outcome, and guarantees teardown.
///
/// No error escapes the runner: the contract is a boolean result plus
/// logged diagnostics.
pub struct WorkflowRunner {
    webdriver_url: String,
    chrome_args: Vec<String>,
}

impl WorkflowRunner {
    pub fn new(webdriver_url: String, chrome_args: Vec<String>) -> Self {
        Self {
            webdriver_url,
            chrome_args,
        }
    }

    /// Provision one inventory source. Returns `true` only if login, every
    /// wizard step, and the sync trigger all completed.
    pub async fn provision(
        &self,
        params: &RunParameters,
        env: &EnvironmentProfile,
        credentials: &Credentials,
    ) -> bool {
        info!(
            "Provisioning inventory source '{}' against {} (profile '{}')",
            params.app_name, env.target_url, params.profile
        );
        self.run(env, credentials, Some(params)).await
    }

    /// Login handshake only: submit credentials and check the marker, then
    /// tear down. A CI preflight for credential and reachability problems.
    pub async fn verify_login(&self, env: &EnvironmentProfile, credentials: &Credentials) -> bool {
        info!("Verifying login against {}", env.target_url);
        self.run(env, credentials, None).await
    }

    async fn run(
        &self,
        env: &EnvironmentProfile,
        credentials: &Credentials,
        params: Option<&RunParameters>,
    ) -> bool {
        let mut session = match BrowserSession::open(&self.webdriver_url, &self.chrome_args).await {
            Ok(session) => session,
            Err(err) => {
                error!("Could not open a browser session: {:#}", err);
                return false;
            }
        };

        let outcome = self.drive(&session, env, credentials, params).await;
        let success = match outcome {
            Ok(()) => true,
            // Login rejection is the one expected failure mode; everything
            // else is unexpected and logged with full context.
            Err(err) => {
                match AwxpilotError::from(err) {
                    AwxpilotError::LoginFailed => {
                        warn!("AWX rejected the login credentials; skipping the wizard")
                    }
                    other => error!("Run failed: {:#}", anyhow::Error::from(other)),
                }
                false
            }
        };

        // Teardown happens on every path; close is idempotent but reached
        // exactly once per run.
        if let Err(err) = session.close().await {
            warn!("Browser teardown reported an error: {:#}", err);
        }
        success
    }

    async fn drive(
        &self,
        session: &BrowserSession,
        env: &EnvironmentProfile,
        credentials: &Credentials,
        params: Option<&RunParameters>,
    ) -> Result<()> {
        session.navigate(&env.target_url).await;
        AuthenticationStage::new(session, credentials, env)
            .login()
            .await?;

        if let Some(params) = params {
            InventoryWizard::new(session, params, env).run().await?;
        }
        Ok(())
    }
}
