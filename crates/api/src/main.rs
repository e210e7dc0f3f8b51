use shelfmate_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shelfmate_observability::init();

    let config = AppConfig::from_env()?;
    tracing::info!(env = %config.env, "configuration loaded");

    let app = shelfmate_api::app::build_app(&config)?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
