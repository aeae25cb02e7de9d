use anyhow::{Context, Result};
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Manages local chromedriver processes.
///
/// AWX runs are Chrome-only; the console's PatternFly markup is what the
/// wizard's positional selectors were calibrated against, in Chrome.
pub struct ChromedriverManager {
    processes: Arc<Mutex<Vec<DriverProcess>>>,
}

struct DriverProcess {
    child: Child,
    port: u16,
    url: String,
    #[cfg(unix)]
    process_group_id: Option<i32>,
}

impl Default for ChromedriverManager {
    fn default() -> Self {
        Self {
            processes: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl ChromedriverManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a chromedriver is running and return the URL to connect to.
    ///
    /// Reuses a managed or externally started driver when one responds on a
    /// known port; otherwise spawns one.
    pub async fn ensure_driver(&self) -> Result<String> {
        let managed_urls: Vec<String> = {
            let processes = self.processes.lock().unwrap();
            processes.iter().map(|p| p.url.clone()).collect()
        };

        for url in managed_urls {
            if Self::is_driver_ready(&url).await {
                debug!("Reusing managed chromedriver at {}", url);
                return Ok(url);
            }
        }

        // chromedriver's default port, for externally managed drivers
        let external = "http://localhost:9515";
        if Self::is_driver_ready(external).await {
            debug!("Found external chromedriver at {}", external);
            return Ok(external.to_string());
        }

        info!("chromedriver not detected, starting one");
        self.start_driver().await
    }

    async fn start_driver(&self) -> Result<String> {
        if !Self::command_exists("chromedriver") {
            anyhow::bail!(
                "chromedriver not found in PATH. Please install it:\n\
                  macOS: brew install chromedriver\n\
                  Linux: Download from https://googlechromelabs.github.io/chrome-for-testing/"
            );
        }

        let port = Self::find_free_port()?;
        info!("Starting chromedriver on port {}", port);

        let mut cmd = Command::new("chromedriver");
        cmd.arg(format!("--port={}", port))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // On Unix, create a new process group so we can kill the entire tree
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let child = cmd.spawn().context("Failed to start chromedriver")?;

        #[cfg(unix)]
        let process_group_id = Some(child.id() as i32);

        let url = format!("http://localhost:{}", port);
        {
            let mut processes = self.processes.lock().unwrap();
            processes.push(DriverProcess {
                child,
                port,
                url: url.clone(),
                #[cfg(unix)]
                process_group_id,
            });
        }

        // Wait for the driver to answer /status (3 seconds total)
        let max_attempts = 30;
        for attempt in 1..=max_attempts {
            if Self::is_driver_ready(&url).await {
                info!("chromedriver ready on port {}", port);
                return Ok(url);
            }
            if attempt < max_attempts {
                sleep(Duration::from_millis(100)).await;
            }
        }

        self.cleanup_failed_process(port);
        anyhow::bail!("chromedriver failed to start within timeout")
    }

    /// Check if a command exists in PATH
    pub fn command_exists(command: &str) -> bool {
        #[cfg(unix)]
        {
            Command::new("which")
                .arg(command)
                .output()
                .map(|output| output.status.success())
                .unwrap_or(false)
        }

        #[cfg(windows)]
        {
            Command::new("where")
                .arg(command)
                .output()
                .map(|output| output.status.success())
                .unwrap_or(false)
        }
    }

    /// Find a free port to run chromedriver on
    pub fn find_free_port() -> Result<u16> {
        // Prefer chromedriver's customary ports before letting the OS pick
        for port in [9515u16, 9516, 9517] {
            if !Self::is_port_in_use(port) {
                debug!("Found free port {}", port);
                return Ok(port);
            }
        }
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        drop(listener);
        Ok(port)
    }

    /// Check if a port is in use
    pub fn is_port_in_use(port: u16) -> bool {
        std::net::TcpListener::bind(("127.0.0.1", port)).is_err()
    }

    /// Check that the driver at `url` reports ready on its /status endpoint
    pub async fn is_driver_ready(url: &str) -> bool {
        let status_url = format!("{}/status", url);
        match reqwest::Client::new()
            .get(&status_url)
            .timeout(Duration::from_secs(1))
            .send()
            .await
        {
            Ok(response) => match response.json::<serde_json::Value>().await {
                Ok(body) => body
                    .get("value")
                    .and_then(|v| v.get("ready"))
                    .and_then(|r| r.as_bool())
                    .unwrap_or(false),
                Err(_) => false,
            },
            Err(_) => false,
        }
    }

    #[cfg(unix)]
    fn kill_process_group(pgid: i32) {
        // SIGTERM first, then SIGKILL for whatever is left
        let _ = Command::new("kill")
            .args(["-TERM", &format!("-{}", pgid)])
            .output();
        std::thread::sleep(Duration::from_millis(100));
        let _ = Command::new("kill")
            .args(["-KILL", &format!("-{}", pgid)])
            .output();
    }

    fn cleanup_failed_process(&self, port: u16) {
        let mut processes = self.processes.lock().unwrap();
        if let Some(index) = processes.iter().position(|p| p.port == port) {
            let mut process = processes.remove(index);

            #[cfg(unix)]
            if let Some(pgid) = process.process_group_id {
                info!("Killing process group {} for failed chromedriver", pgid);
                Self::kill_process_group(pgid);
            }

            let _ = process.child.kill();
        }
    }

    /// Stop all managed chromedriver processes
    pub fn stop_all(&self) {
        let mut processes = self.processes.lock().unwrap();
        for process in processes.iter_mut() {
            debug!("Stopping chromedriver on port {}", process.port);

            #[cfg(unix)]
            if let Some(pgid) = process.process_group_id {
                Self::kill_process_group(pgid);
            }

            let _ = process.child.kill();
        }
        processes.clear();
    }
}

impl Drop for ChromedriverManager {
    fn drop(&mut self) {
        self.stop_all();
    }
}

// Global chromedriver manager instance
lazy_static::lazy_static! {
    pub static ref GLOBAL_DRIVER_MANAGER: ChromedriverManager = ChromedriverManager::new();
}

#[cfg(test)]
#[path = "driver_test.rs"]
mod driver_test;
