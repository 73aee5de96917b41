use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;

use customers_rs::handlers::ApiState;
use customers_rs::repositories::InMemoryCustomerRepository;
use customers_rs::server::{create_app, Server, ServerError};
use customers_rs::services::CustomerService;

/// A running server instance on an ephemeral port, backed by the in-memory
/// repository, with a client pointed at it.
pub struct TestEnvironment {
    base_url: String,
    client: reqwest::Client,
    shutdown: Arc<Notify>,
    handle: JoinHandle<Result<(), ServerError>>,
}

impl TestEnvironment {
    pub async fn start() -> Self {
        let repository = Arc::new(InMemoryCustomerRepository::new());
        let state = ApiState {
            customer_service: CustomerService::new(repository),
        };

        let app = create_app(state, Duration::from_secs(5));
        let server = Server::bind("127.0.0.1:0", app, Duration::from_secs(5))
            .await
            .expect("failed to bind test server");
        let address = server.local_addr().expect("listener has no local addr");

        let shutdown = Arc::new(Notify::new());
        let trigger = shutdown.clone();
        let handle = tokio::spawn(async move {
            server
                .serve_with_shutdown(async move { trigger.notified().await })
                .await
        });

        Self {
            base_url: format!("http://{address}"),
            client: reqwest::Client::new(),
            shutdown,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Signals shutdown and waits for the server to drain.
    pub async fn shutdown(self) -> Result<(), ServerError> {
        self.shutdown.notify_one();
        self.handle.await.expect("server task panicked")
    }
}
