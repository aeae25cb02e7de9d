use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info};

use crate::config::{Credentials, EnvironmentProfile};
use crate::errors::AwxpilotError;
use crate::locator::By;
use crate::session::BrowserSession;

// PatternFly login form controls (AWX 18.x)
const USERNAME_INPUT_ID: &str = "pf-login-username-id";
const PASSWORD_INPUT_ID: &str = "pf-login-password-id";
// The login page's only button; on that page the first .pf-c-button is the
// submit control.
const SUBMIT_BUTTON_CLASS: &str = "pf-c-button";

/// Present on every authenticated page and absent on the login page. Login
/// success is not observable at the HTTP level from inside the browser, so
/// this marker's appearance is the success signal.
const AUTH_MARKER_CLASS: &str = "pf-c-page__main";

/// How long the marker gets to appear before the login counts as rejected.
const AUTH_MARKER_TIMEOUT: Duration = Duration::from_secs(10);

/// Performs the login handshake and validates it succeeded.
pub struct AuthenticationStage<'a> {
    session: &'a BrowserSession,
    credentials: &'a Credentials,
    env: &'a EnvironmentProfile,
}

impl<'a> AuthenticationStage<'a> {
    pub fn new(
        session: &'a BrowserSession,
        credentials: &'a Credentials,
        env: &'a EnvironmentProfile,
    ) -> Self {
        Self {
            session,
            credentials,
            env,
        }
    }

    /// Submit credentials, verify the authenticated-page marker appears,
    /// then deep-link to the add-source form.
    ///
    /// A missing login control propagates as element-not-found (the login
    /// page is assumed malformed or unreachable). A marker that never
    /// appears is [`AwxpilotError::LoginFailed`], the one expected failure
    /// kind of the whole run.
    pub async fn login(&self) -> Result<()> {
        let locator = self.session.locator()?;

        debug!("Submitting credentials as '{}'", self.credentials.username);
        let username = locator.find_one(&By::id(USERNAME_INPUT_ID)).await?;
        let password = locator.find_one(&By::id(PASSWORD_INPUT_ID)).await?;
        let submit = locator.find_one(&By::class(SUBMIT_BUTTON_CLASS)).await?;

        username.send_keys(&self.credentials.username).await?;
        password.send_keys(&self.credentials.password).await?;
        submit.click().await?;

        match locator
            .wait_for(&By::class(AUTH_MARKER_CLASS), AUTH_MARKER_TIMEOUT)
            .await
        {
            Ok(_) => {}
            Err(err) => {
                return match AwxpilotError::from(err) {
                    AwxpilotError::WaitTimeout { .. } => Err(AwxpilotError::LoginFailed.into()),
                    other => Err(other.into()),
                };
            }
        }

        // Deep-linking straight to the form saves the menu navigation.
        let add_source = self.env.add_source_url();
        info!("Login verified, opening {}", add_source);
        self.session.navigate(&add_source).await;
        Ok(())
    }
}
