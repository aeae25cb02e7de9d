//! # awxpilot
#![allow(clippy::uninlined_format_args)]
//!
//! Provisions AWX inventory sources from CI by driving the web console with
//! a real browser.
//!
//! AWX's add-inventory-source wizard is the only supported way to register a
//! source on the platform versions this targets, so the tool logs in through
//! the login form, deep-links to the wizard, fills out the nine form steps
//! (including the source-path patch the AWX 18.x dropdown defect requires),
//! saves, and triggers the first sync. The outcome of a run is a single
//! boolean: either the source exists and its sync started, or it does not.
//!
//! ## CLI usage
//!
//! ```bash
//! # Create the inventory source for an application and trigger a sync
//! awxpilot provision nd-sre-api --profile dev --project develop
//!
//! # Preflight: check credentials and reachability without touching state
//! awxpilot verify --profile dev
//!
//! # List the built-in environment profiles
//! awxpilot profiles
//!
//! # Watch the browser work
//! awxpilot provision nd-sre-api --profile dev --project develop --no-headless
//! ```
//!
//! Credentials come from `AWXPILOT_USERNAME` / `AWXPILOT_PASSWORD`, falling
//! back to the dev service account. A local `chromedriver` is started
//! automatically when none is running; `--webdriver-url` points at an
//! existing one instead.
//!
//! Completed runs print a JSON report line on stdout and exit 0 on success,
//! 1 on failure. Errors raised before the run starts (unknown profile,
//! missing chromedriver) exit with per-kind codes, see
//! [`errors::AwxpilotError`].
//!
//! ## Library usage
//!
//! ```no_run
//! use awxpilot::config::{Credentials, EnvironmentProfile, RunParameters, chrome_args};
//! use awxpilot::workflow::WorkflowRunner;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let env = EnvironmentProfile::resolve("dev")?;
//! let runner = WorkflowRunner::new("http://localhost:9515".into(), chrome_args(true));
//! let params = RunParameters {
//!     app_name: "nd-sre-api".into(),
//!     profile: "dev".into(),
//!     project: "develop".into(),
//! };
//! let _ok = runner.provision(&params, &env, &Credentials::from_env()).await;
//! # Ok(())
//! # }
//! ```

/// Run parameters, environment profiles, credentials, Chrome flags
pub mod config;

/// Automatic chromedriver process management
pub mod driver;

/// Error taxonomy with exit codes
pub mod errors;

/// Element lookup and condition polling
pub mod locator;

/// Browser session lifecycle
pub mod session;

/// Login stage, wizard steps, and the workflow runner
pub mod workflow;

pub use config::{Credentials, EnvironmentProfile, RunParameters};
pub use errors::AwxpilotError;
pub use locator::{By, ElementLocator};
pub use session::BrowserSession;
pub use workflow::WorkflowRunner;
