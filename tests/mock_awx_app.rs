// Mock AWX control plane shared between integration tests and the
// standalone mock-awx binary. Serves a PatternFly-shaped login page and
// add-source wizard, and records what the browser did in shared state
// exposed at /api/_state.

use axum::{
    Form, Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

const VALID_USERNAME: &str = "jenkins";
const VALID_PASSWORD: &str = "dlswmd_1";
const SESSION_COOKIE: &str = "awx_session=ok";

#[derive(Clone)]
pub struct AppState {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default, Serialize)]
struct MockState {
    login_attempts: Vec<LoginAttempt>,
    sources: Vec<SavedSource>,
    sync_count: usize,
    /// Element id left out of the wizard page, for fault injection
    #[serde(skip)]
    omit: Option<String>,
}

#[derive(Serialize, Clone, Debug)]
struct LoginAttempt {
    username: String,
    accepted: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
struct SavedSource {
    name: String,
    source: String,
    source_path: Option<String>,
    overwrite: bool,
    overwrite_vars: bool,
    host_filter: Option<String>,
    project: Option<String>,
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

#[derive(Deserialize)]
struct MockConfig {
    omit: Option<String>,
}

pub async fn create_app() -> Router {
    let state = AppState {
        inner: Arc::new(Mutex::new(MockState::default())),
    };

    Router::new()
        .route("/", get(root_page))
        .route("/login", post(handle_login))
        .route("/api/sources", post(record_source))
        .route("/api/sync", post(record_sync))
        .route("/api/_state", get(state_snapshot))
        .route("/api/_reset", post(reset_state))
        .route("/api/_config", post(configure))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn is_authenticated(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|cookies| cookies.contains(SESSION_COOKIE))
        .unwrap_or(false)
}

// The login page and the hash-routed wizard share the "/" path, like the
// real single-page console: the fragment never reaches the server.
async fn root_page(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    if is_authenticated(&headers) {
        let omit = state.inner.lock().await.omit.clone();
        Html(wizard_page(omit.as_deref()))
    } else {
        Html(login_page())
    }
}

async fn handle_login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> axum::response::Response {
    let accepted = form.username == VALID_USERNAME && form.password == VALID_PASSWORD;
    state.inner.lock().await.login_attempts.push(LoginAttempt {
        username: form.username,
        accepted,
    });

    if accepted {
        (
            [(header::SET_COOKIE, format!("{}; Path=/", SESSION_COOKIE))],
            Redirect::to("/"),
        )
            .into_response()
    } else {
        // Back to the login page, no session cookie, no marker element
        Redirect::to("/").into_response()
    }
}

async fn record_source(
    State(state): State<AppState>,
    Json(source): Json<SavedSource>,
) -> StatusCode {
    state.inner.lock().await.sources.push(source);
    StatusCode::CREATED
}

async fn record_sync(State(state): State<AppState>) -> StatusCode {
    state.inner.lock().await.sync_count += 1;
    StatusCode::ACCEPTED
}

async fn state_snapshot(State(state): State<AppState>) -> Json<serde_json::Value> {
    let state = state.inner.lock().await;
    Json(serde_json::to_value(&*state).unwrap_or_default())
}

async fn reset_state(State(state): State<AppState>) -> StatusCode {
    *state.inner.lock().await = MockState::default();
    StatusCode::OK
}

async fn configure(State(state): State<AppState>, Json(config): Json<MockConfig>) -> StatusCode {
    state.inner.lock().await.omit = config.omit;
    StatusCode::OK
}

fn login_page() -> String {
    r#"<!DOCTYPE html>
<html>
<head><title>AWX</title></head>
<body class="pf-c-login">
    <form method="post" action="/login">
        <input id="pf-login-username-id" name="username" class="pf-c-form-control" type="text">
        <input id="pf-login-password-id" name="password" class="pf-c-form-control" type="password">
        <button class="pf-c-button pf-m-primary" type="submit">Log In</button>
    </form>
</body>
</html>"#
        .to_string()
}

// Fault-injection keys, one per wizard step's required element:
//   form-controls  strips the shared input class so no form control matches
//   source-select  drops the source-kind dropdown (third form control)
//   project        drops the project trigger button
//   select-button  drops the modal confirm (third primary button)
//   source_path    drops the path dropdown
//   checkboxes     drops both overwrite toggles
//   host-filter    drops the filter input
//   save-button    drops the save action (second primary after the modal closes)
//   sync-button    drops the sync action (second secondary button)
fn wizard_page(omit: Option<&str>) -> String {
    let omitted = |id: &str| omit == Some(id);

    let control_class = if omitted("form-controls") {
        "pf-c-form-control-faulted"
    } else {
        "pf-c-form-control"
    };

    let source_select = if omitted("source-select") {
        String::new()
    } else {
        format!(
            r#"<select class="{control_class}">
            <option value="">Choose a source</option>
            <option value="scm">Sourced from a Project</option>
            <option value="ec2">Amazon EC2</option>
        </select>"#
        )
    };

    let project_trigger = if omitted("project") {
        ""
    } else {
        r#"<button id="project" type="button" class="pf-c-button">Project</button>"#
    };

    let select_button = if omitted("select-button") {
        ""
    } else {
        r#"<button class="pf-c-button pf-m-primary" type="button" onclick="closeProjectModal()">Select</button>"#
    };

    let source_path_select = if omitted("source_path") {
        ""
    } else {
        r#"<select id="source_path">
            <option value="/ (project root)">/ (project root)</option>
        </select>"#
    };

    let checkboxes = if omitted("checkboxes") {
        ""
    } else {
        r#"<label class="pf-c-check">
            <input id="option-overwrite" class="pf-c-check__input" type="checkbox">
            Overwrite
        </label>
        <label class="pf-c-check">
            <input id="option-overwrite-vars" class="pf-c-check__input" type="checkbox">
            Overwrite variables
        </label>"#
    };

    let host_filter_input = if omitted("host-filter") {
        String::new()
    } else {
        format!(r#"<input id="host-filter" class="{control_class}" type="text">"#)
    };

    let save_button = if omitted("save-button") {
        ""
    } else {
        r#"<button class="pf-c-button pf-m-primary" type="button" onclick="saveSource()">Save</button>"#
    };

    let sync_button = if omitted("sync-button") {
        ""
    } else {
        r#"<button class="pf-c-button pf-m-secondary" type="button" onclick="triggerSync()">Sync</button>"#
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>AWX - Inventories</title></head>
<body>
<div class="pf-c-page__main">
    <header>
        <button class="pf-c-button pf-m-primary" type="button">Add</button>
    </header>
    <form id="source-form">
        <input class="{control_class}" type="text">
        <input class="{control_class}" type="text">
        {source_select}
        {project_trigger}
        {source_path_select}
        {checkboxes}
        {host_filter_input}
        {save_button}
        <button class="pf-c-button pf-m-secondary" type="button">Cancel</button>
        {sync_button}
    </form>
    <div id="project-modal">
        <div class="pf-m-filter-group">
            <input class="{control_class}" type="search">
            <button type="button" aria-label="Search submit button" onclick="searchProjects()">Search</button>
        </div>
        <div id="project-results"></div>
        {select_button}
    </div>
</div>
<script>
{js}
</script>
</body>
</html>"#,
        js = WIZARD_JS,
    )
}

// Synchronous XHR so a click's side effect is recorded before the WebDriver
// command returns; the browser may be torn down right after the last click.
const WIZARD_JS: &str = r#"
function postJson(url, body) {
    var xhr = new XMLHttpRequest();
    xhr.open('POST', url, false);
    xhr.setRequestHeader('Content-Type', 'application/json');
    xhr.send(JSON.stringify(body));
}

function searchProjects() {
    var query = document.querySelector('.pf-m-filter-group input').value;
    setTimeout(function () {
        var row = document.createElement('div');
        row.className = 'pf-c-data-list__item-content';
        row.textContent = query;
        row.onclick = function () { window.selectedProject = query; };
        document.getElementById('project-results').appendChild(row);
    }, 150);
}

function saveSource() {
    var controls = document.getElementsByClassName('pf-c-form-control');
    var pathSelect = document.getElementById('source_path');
    var hostFilter = document.getElementById('host-filter');
    postJson('/api/sources', {
        name: controls[0].value,
        source: controls[2].value,
        source_path: pathSelect ? pathSelect.value : null,
        overwrite: document.getElementById('option-overwrite').checked,
        overwrite_vars: document.getElementById('option-overwrite-vars').checked,
        host_filter: hostFilter ? hostFilter.value : null,
        project: window.selectedProject || null
    });
}

function triggerSync() {
    postJson('/api/sync', {});
}

function closeProjectModal() {
    document.getElementById('project-modal').remove();
}
"#;
