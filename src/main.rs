use std::sync::Arc;

use tracing::info;

use customers_rs::config::Config;
use customers_rs::handlers::ApiState;
use customers_rs::observability::init_observability;
use customers_rs::repositories::PostgresCustomerRepository;
use customers_rs::server::{create_app, Server};
use customers_rs::services::CustomerService;
use customers_rs::db;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_environment()?;

    init_observability(&config.observability)?;

    let pool = db::connect(&config.database).await?;
    db::migrate(&pool).await?;

    let repository = Arc::new(PostgresCustomerRepository::new(pool));
    let customer_service = CustomerService::new(repository);

    let app = create_app(
        ApiState { customer_service },
        config.server.request_timeout(),
    );

    let address = format!("{}:{}", config.server.host, config.server.port);
    let server = Server::bind(&address, app, config.server.shutdown_timeout()).await?;

    info!(%address, "Server listening");

    server.serve().await?;

    info!("Server stopped");

    Ok(())
}
