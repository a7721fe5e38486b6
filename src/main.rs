use std::sync::Arc;

use birth_intake::{
    IntakeSession, SuggestionState,
    config::Config,
    geocoding::NominatimClient,
    terminal::{self, Flow},
    timezone::GeoNamesClient,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::watch,
};
use tracing::{Instrument, error, info, span};
use tracing_subscriber::EnvFilter;

/// Initializes tracing, builds the HTTP clients from the environment and reads
/// form commands from stdin until the user types `exit` or closes the input.
/// Suggestion lists are printed by a watcher task as they arrive.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    let search = NominatimClient::new(&config.search_endpoint, config.http_timeout)?;
    let timezone = GeoNamesClient::new(
        &config.timezone_endpoint,
        &config.geonames_username,
        config.http_timeout,
    )?;

    let mut session = IntakeSession::new(Arc::new(search), Arc::new(timezone), config.search);
    tokio::spawn(watch_suggestions(session.subscribe()));

    span!(tracing::Level::INFO, "intake").in_scope(|| {
        info!("Enter your birth details. Type `help` for commands, `exit` to stop");
    });

    let mut stdout = std::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    terminal::prompt(&mut stdout)?;

    while let Some(line) = lines.next_line().await? {
        let flow = terminal::run_line(&mut session, &line, &mut stdout)
            .instrument(span!(tracing::Level::INFO, "command"))
            .await?;
        if flow == Flow::Exit {
            break;
        }
        terminal::prompt(&mut stdout)?;
    }

    Ok(())
}

async fn watch_suggestions(mut updates: watch::Receiver<SuggestionState>) {
    while updates.changed().await.is_ok() {
        let state = updates.borrow_and_update().clone();
        if let Err(e) = terminal::render_suggestions(&state, &mut std::io::stdout()) {
            error!("Failed to draw suggestions: {}", e);
            break;
        }
    }
}
