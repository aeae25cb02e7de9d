use std::time::Duration;

use anyhow::{Context, Result};
use fantoccini::elements::Element;
use serde_json::json;
use tracing::{debug, info};

use crate::config::{EnvironmentProfile, RunParameters};
use crate::errors::AwxpilotError;
use crate::locator::By;
use crate::session::BrowserSession;

// Shared PatternFly style classes. Several wizard controls carry no unique
// identifier, only one of these classes; where that is the case the workflow
// selects by position. The indices below encode the observed structure of
// the AWX 18.x add-source form and are part of the contract: the Nth element
// of a class IS the control, there is nothing more semantic to select by.
const FORM_CONTROL_CLASS: &str = "pf-c-form-control";
const PRIMARY_BUTTON_CLASS: &str = "pf-m-primary";
const SECONDARY_BUTTON_CLASS: &str = "pf-m-secondary";
const CHECKBOX_CLASS: &str = "pf-c-check__input";
const RESULT_ROW_CLASS: &str = "pf-c-data-list__item-content";

const NAME_INPUT_IDX: usize = 0;
const SOURCE_KIND_SELECT_IDX: usize = 2;
const PROJECT_CONFIRM_BUTTON_IDX: usize = 2;
const SAVE_BUTTON_IDX: usize = 1;
const SYNC_BUTTON_IDX: usize = 1;
const OVERWRITE_HOSTS_IDX: usize = 0;
const OVERWRITE_VARS_IDX: usize = 1;

// Identified controls
const PROJECT_TRIGGER_ID: &str = "project";
const SOURCE_PATH_SELECT_ID: &str = "source_path";
const HOST_FILTER_INPUT_ID: &str = "host-filter";
const FILTER_GROUP_CLASS: &str = "pf-m-filter-group";
const SEARCH_INPUT_CSS: &str = "input[class='pf-c-form-control']";
const SEARCH_SUBMIT_CSS: &str = "button[aria-label='Search submit button']";

/// Source kind submitted in step 2: sourced from a project
const SOURCE_KIND_SCM: &str = "scm";

/// The one option AWX always renders in the source-path dropdown
const ROOT_PATH_OPTION_VALUE: &str = "/ (project root)";

const FORM_RENDER_TIMEOUT: Duration = Duration::from_secs(10);
const SEARCH_RESULT_TIMEOUT: Duration = Duration::from_secs(10);
const SYNC_BUTTON_TIMEOUT: Duration = Duration::from_secs(10);
/// Re-render pause after picking a project row; nothing pollable changes.
const SELECTION_SETTLE: Duration = Duration::from_millis(500);

/// The source path AWX should sync hosts from for an application.
pub fn source_path(app_name: &str) -> String {
    format!("inventories/{}/hosts", app_name)
}

/// The ordered steps that fill out the add-inventory-source form.
///
/// Every step re-queries the live page: AWX re-renders the DOM between
/// steps, so element handles do not survive. No step is retried; the first
/// failure aborts the remainder and propagates to the runner.
pub struct InventoryWizard<'a> {
    session: &'a BrowserSession,
    params: &'a RunParameters,
    env: &'a EnvironmentProfile,
}

impl<'a> InventoryWizard<'a> {
    pub fn new(
        session: &'a BrowserSession,
        params: &'a RunParameters,
        env: &'a EnvironmentProfile,
    ) -> Self {
        Self {
            session,
            params,
            env,
        }
    }

    /// Run all nine steps in order.
    pub async fn run(&self) -> Result<()> {
        self.enter_name().await?;
        self.select_source_kind().await?;
        self.search_project().await?;
        self.select_project().await?;
        self.patch_source_path().await?;
        self.toggle_overwrite_options().await?;
        self.enter_host_filter().await?;
        self.save().await?;
        self.trigger_sync().await?;
        info!("Inventory source '{}' saved and sync triggered", self.params.app_name);
        Ok(())
    }

    /// Step 1: type the source name into the first form control.
    async fn enter_name(&self) -> Result<()> {
        debug!("Step 1: entering name '{}'", self.params.app_name);
        let locator = self.session.locator()?;
        locator
            .wait_for(&By::class(FORM_CONTROL_CLASS), FORM_RENDER_TIMEOUT)
            .await
            .context("add-source form never rendered")?;

        let name_input = self
            .nth(&By::class(FORM_CONTROL_CLASS), NAME_INPUT_IDX, "name input")
            .await?;
        name_input.send_keys(&self.params.app_name).await?;
        Ok(())
    }

    /// Step 2: pick "sourced from a project" in the source-kind dropdown,
    /// the third form control.
    async fn select_source_kind(&self) -> Result<()> {
        debug!("Step 2: selecting source kind '{}'", SOURCE_KIND_SCM);
        let select = self
            .nth(
                &By::class(FORM_CONTROL_CLASS),
                SOURCE_KIND_SELECT_IDX,
                "source-kind dropdown",
            )
            .await?;
        select.select_by_value(SOURCE_KIND_SCM).await?;
        Ok(())
    }

    /// Step 3: open the project picker, search for the project, and wait
    /// for result rows to render.
    async fn search_project(&self) -> Result<()> {
        debug!("Step 3: searching project '{}'", self.params.project);
        let locator = self.session.locator()?;

        let trigger = locator.find_one(&By::id(PROJECT_TRIGGER_ID)).await?;
        trigger.click().await?;

        let group = locator.find_one(&By::class(FILTER_GROUP_CLASS)).await?;
        let search_input = locator.find_in(&group, &By::css(SEARCH_INPUT_CSS)).await?;
        search_input.send_keys(&self.params.project).await?;

        let submit = locator.find_in(&group, &By::css(SEARCH_SUBMIT_CSS)).await?;
        submit.click().await?;

        locator
            .wait_for(&By::class(RESULT_ROW_CLASS), SEARCH_RESULT_TIMEOUT)
            .await
            .context("project search returned no rows")?;
        Ok(())
    }

    /// Step 4: pick the first result row, then confirm via the third
    /// primary button.
    async fn select_project(&self) -> Result<()> {
        debug!("Step 4: selecting first project result");
        let locator = self.session.locator()?;

        let row = locator.find_one(&By::class(RESULT_ROW_CLASS)).await?;
        row.click().await?;
        locator.settle(SELECTION_SETTLE).await;

        let confirm = self
            .nth(
                &By::class(PRIMARY_BUTTON_CLASS),
                PROJECT_CONFIRM_BUTTON_IDX,
                "project confirm button",
            )
            .await?;
        confirm.click().await?;
        Ok(())
    }

    /// Step 5: rewrite the root-path option to the per-application path and
    /// re-select by the new value.
    ///
    /// AWX 18.x omits the per-application entry from the source-path
    /// dropdown, so the one option that is always rendered gets patched in
    /// place through injected scripts. Patch, then reselect, in that order:
    /// selecting first would latch the unpatched value. Delete this step
    /// once the platform renders the real option list.
    async fn patch_source_path(&self) -> Result<()> {
        let path = source_path(&self.params.app_name);
        debug!("Step 5: patching source path to '{}'", path);
        let locator = self.session.locator()?;

        let select = locator.find_one(&By::id(SOURCE_PATH_SELECT_ID)).await?;
        let option_css = format!("option[value='{}']", ROOT_PATH_OPTION_VALUE);
        let option = locator.find_in(&select, &By::css(&option_css)).await?;

        self.session
            .execute(
                "arguments[0].setAttribute('value', arguments[1]);",
                vec![serde_json::to_value(&option)?, json!(path)],
            )
            .await?;
        self.session
            .execute(
                "arguments[0].textContent = arguments[1];",
                vec![serde_json::to_value(&option)?, json!(path)],
            )
            .await?;

        // Fresh handle: the select is re-read after the DOM mutation
        let select = locator.find_one(&By::id(SOURCE_PATH_SELECT_ID)).await?;
        select.select_by_value(&path).await?;
        Ok(())
    }

    /// Step 6: enable "overwrite hosts" and "overwrite variables", the
    /// first two checkboxes on the page.
    async fn toggle_overwrite_options(&self) -> Result<()> {
        debug!("Step 6: toggling overwrite options");
        let overwrite_hosts = self
            .nth(
                &By::class(CHECKBOX_CLASS),
                OVERWRITE_HOSTS_IDX,
                "overwrite-hosts checkbox",
            )
            .await?;
        overwrite_hosts.click().await?;

        let overwrite_vars = self
            .nth(
                &By::class(CHECKBOX_CLASS),
                OVERWRITE_VARS_IDX,
                "overwrite-variables checkbox",
            )
            .await?;
        overwrite_vars.click().await?;
        Ok(())
    }

    /// Step 7: type the environment's host filter.
    async fn enter_host_filter(&self) -> Result<()> {
        debug!("Step 7: entering host filter '{}'", self.env.host_filter);
        let locator = self.session.locator()?;
        let input = locator.find_one(&By::id(HOST_FILTER_INPUT_ID)).await?;
        input.send_keys(&self.env.host_filter).await?;
        Ok(())
    }

    /// Step 8: click the save action, the second primary button.
    async fn save(&self) -> Result<()> {
        debug!("Step 8: saving inventory source");
        let save = self
            .nth(
                &By::class(PRIMARY_BUTTON_CLASS),
                SAVE_BUTTON_IDX,
                "save button",
            )
            .await?;
        save.click().await?;
        Ok(())
    }

    /// Step 9: once the detail view renders, click the sync action, the
    /// second secondary button.
    async fn trigger_sync(&self) -> Result<()> {
        debug!("Step 9: triggering source sync");
        let locator = self.session.locator()?;
        let buttons = locator
            .wait_for_count(
                &By::class(SECONDARY_BUTTON_CLASS),
                SYNC_BUTTON_IDX + 1,
                SYNC_BUTTON_TIMEOUT,
            )
            .await
            .context("post-save view never rendered sync controls")?;
        buttons[SYNC_BUTTON_IDX].click().await?;
        Ok(())
    }

    /// Positional accessor: the `index`-th element of a shared style class.
    /// Absence is fatal and reported with the human name of the control.
    async fn nth(&self, by: &By, index: usize, what: &str) -> Result<Element> {
        let found = self.session.locator()?.find_all(by).await?;
        found.into_iter().nth(index).ok_or_else(|| {
            AwxpilotError::ElementNotFound(format!("{} ({}[{}])", what, by, index)).into()
        })
    }
}

#[cfg(test)]
#[path = "wizard_test.rs"]
mod wizard_test;
