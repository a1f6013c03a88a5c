// bin/tempalarm.rs

use std::sync::Arc;

use tempalarm::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "tempalarm=info,tower_http=info";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .init();

    info!("Starting up tempalarm v{FW_VERSION}.");

    let config = MyConfig::from_env()?;
    info!("My config:\n{config:#?}");

    let shared_state = Arc::new(MyState::new(config));

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async move {
            info!("Entering main loop...");
            tokio::select! {
                res = run_api_server(shared_state.clone()) => {
                    error!("run_api_server() ended.");
                    res?;
                }
                res = tokio::signal::ctrl_c() => {
                    info!("Interrupted, shutting down.");
                    res?;
                }
            };
            Ok::<(), anyhow::Error>(())
        })
}

// EOF
