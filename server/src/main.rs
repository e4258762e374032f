use log::{error, info};
use model::ModelRegistry;
use server::ServerConfig;
use tokio::{net::TcpListener, signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = ServerConfig::from_env()?;
    let registry = ModelRegistry::load(&config.model_path)?;

    let list = TcpListener::bind(config.addr()).await?;
    info!("listening at {}", list.local_addr()?);

    server::serve(list, registry, shutdown_signal()).await?;
    info!("server stopped");

    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("received SIGINT, draining requests"),
        Err(e) => {
            error!("cannot listen for SIGINT: {e}");
            std::future::pending::<()>().await;
        }
    }
}
