// Mock AWX server for integration tests

use tokio::sync::OnceCell;

// Include the mock control plane inline
include!("mock_awx_app.rs");

static MOCK_AWX: OnceCell<MockAwxHandle> = OnceCell::const_new();

pub struct MockAwxHandle {
    pub base_url: String,
}

/// Start the mock control plane once for all tests
pub async fn ensure_mock_awx() -> &'static MockAwxHandle {
    MOCK_AWX
        .get_or_init(|| async {
            // Get a free port first
            let std_listener =
                std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind mock AWX");
            let addr = std_listener.local_addr().unwrap();
            let base_url = format!("http://{}", addr);
            // Close the listener so the server thread can bind to it
            drop(std_listener);

            // Spawn the server in a dedicated thread with its own runtime
            std::thread::spawn(move || {
                let runtime = tokio::runtime::Runtime::new().expect("Failed to create runtime");

                runtime.block_on(async {
                    let listener = tokio::net::TcpListener::bind(addr)
                        .await
                        .expect("Failed to bind in thread");
                    let app = create_app().await;
                    axum::serve(listener, app).await.expect("Mock AWX failed");
                });
            });

            // Wait for the server to answer HTTP before handing it out
            for attempt in 0..30 {
                tokio::time::sleep(tokio::time::Duration::from_millis(200)).await;

                let ready = reqwest::get(&base_url)
                    .await
                    .map(|r| r.status().is_success())
                    .unwrap_or(false);
                if ready {
                    eprintln!("Mock AWX ready at {} after {} attempts", base_url, attempt + 1);
                    break;
                }

                if attempt == 29 {
                    panic!("Mock AWX failed to start after 30 attempts");
                }
            }

            MockAwxHandle { base_url }
        })
        .await
}
