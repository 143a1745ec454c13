use anyhow::Context;

use clmm_swap_sim::{bootstrap, config, web};

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Load configuration
    let config = config::Config::from_env().context("Failed to load configuration")?;

    // Build application state
    let app_state = bootstrap::AppState::new(&config).context("Failed to initialize application state")?;

    log::info!("starting swap simulator on port {}", config.port);
    web::build_rocket(config.port, app_state)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket failed: {}", e))?;
    Ok(())
}
