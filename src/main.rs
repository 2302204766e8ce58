use anyhow::Result;
use farm_dash::api::{ApiError, FarmApi, FarmRest};
use farm_dash::api::types::Farm;
use farm_dash::clock::{Clock, SystemClock};
use farm_dash::config::Config;
use farm_dash::pipeline;
use farm_dash::session::{FileStore, KeyValueStore, Session};
use farm_dash::tui::state::DashboardState;
use farm_dash::tui::{self, DashboardCommand};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing_subscriber::EnvFilter;

/// Make sure the session holds a token: env var, stored token, or interactive sign-in.
async fn ensure_signed_in(rest: &FarmRest) -> Result<()> {
    if let Some(token) = Config::env_token() {
        rest.session().set_token(&token)?;
        return Ok(());
    }
    if rest.session().is_authenticated() {
        return Ok(());
    }
    println!("  Sign in to the farm server:");
    let (username, password) = Config::prompt_credentials()?;
    rest.login(&username, &password).await
}

async fn open_farm(rest: &FarmRest, configured: Option<i64>) -> Result<Farm> {
    match pipeline::resolve_farm(rest, configured).await {
        Ok(farm) => Ok(farm),
        Err(e) if matches!(e.downcast_ref::<ApiError>(), Some(ApiError::Unauthorized)) => {
            // Stored token expired: sign in once more, then give up.
            tracing::warn!("stored token rejected, prompting for credentials");
            rest.session().clear()?;
            println!("  Session expired.");
            let (username, password) = Config::prompt_credentials()?;
            rest.login(&username, &password).await?;
            pipeline::resolve_farm(rest, configured).await
        }
        Err(e) => Err(e),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load(Path::new("config.toml"))?;

    // Load saved values from .env (real env vars take precedence)
    Config::load_env_file();

    let log_file = std::fs::File::create(&config.dashboard.log_file)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("farm_dash=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(log_file)
        .init();

    println!();
    println!("  Farm Dashboard v0.1.0");
    println!("  =====================");
    println!();

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.storage.session_file));
    let session = Session::new(store);
    let rest = Arc::new(FarmRest::new(
        session,
        &config.api.base_url,
        config.api.request_timeout(),
    )?);

    ensure_signed_in(&rest).await?;
    let farm = open_farm(&rest, config.dashboard.farm_id).await?;
    println!("  Farm: {} (#{})", farm.name, farm.id);
    tracing::info!(farm_id = farm.id, farm = %farm.name, "dashboard starting");

    let (state_tx, state_rx) = watch::channel({
        let mut s = DashboardState::new();
        s.farm_id = Some(farm.id);
        s.farm_name = Some(farm.name.clone());
        s
    });
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<DashboardCommand>(16);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let enforce_year = config.production.enforce_year_match;
    let refresh_every = Duration::from_secs(config.dashboard.refresh_interval_s.max(1));
    let api: Arc<dyn FarmApi> = rest.clone();
    let farm_id = farm.id;

    let engine = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(refresh_every);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let _ = pipeline::refresh(
                        api.as_ref(),
                        farm_id,
                        clock.as_ref(),
                        enforce_year,
                        &state_tx,
                    )
                    .await;
                }
                cmd = cmd_rx.recv() => {
                    match cmd {
                        None | Some(DashboardCommand::Quit) => break,
                        Some(DashboardCommand::Refresh) => {
                            state_tx.send_modify(|s| {
                                s.push_log("INFO", "manual refresh".to_string())
                            });
                            let _ = pipeline::refresh(
                                api.as_ref(),
                                farm_id,
                                clock.as_ref(),
                                enforce_year,
                                &state_tx,
                            )
                            .await;
                            ticker.reset();
                        }
                    }
                }
            }
        }
    });

    tui::run_dashboard(state_rx, cmd_tx).await?;
    // Don't wait on a refresh that is still in flight.
    engine.abort();
    let _ = engine.await;

    tracing::debug!("shutting down");
    Ok(())
}
