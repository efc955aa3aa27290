use anyhow::Context;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt };
use lib::{ app, config::Config };

// serve the parameter form and simulation results over HTTP

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let bind_addr = config.bind_address.clone();
    let app = app::router(config).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("BEC simulator running on http://{}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
