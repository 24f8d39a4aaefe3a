//! Main entry point for the AskMe server.
//!
//! Parses the command line, sets up logging and dispatches to the HTTP
//! server or one of the administrative subcommands.

use std::sync::Arc;
use std::time::Duration;

use askme_migration::{Migrator, MigratorTrait};
use askme_persistence::{ExternalDbPersistService, PersistenceService};
use askme_server::{
    command::{self, GenerateCounts},
    model::{AppState, Cli, Command, Configuration, constants::APP_NAME},
    startup::{self, LoggingConfig},
};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

const TOKEN_PURGE_INTERVAL: Duration = Duration::from_secs(3600);

async fn connect(configuration: &Configuration) -> anyhow::Result<Arc<dyn PersistenceService>> {
    let db = configuration.database_connection().await?;
    Ok(Arc::new(ExternalDbPersistService::new(db)))
}

/// Drop expired token rows in the background
fn spawn_token_purge(persistence: Arc<dyn PersistenceService>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TOKEN_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            if let Err(e) = persistence.token_purge_expired(chrono::Utc::now()).await {
                tracing::warn!("failed to purge expired tokens: {}", e);
            }
        }
    });
}

async fn serve(configuration: Configuration) -> anyhow::Result<()> {
    let db = configuration.database_connection().await?;
    if configuration.migrate_on_startup() {
        info!("applying pending migrations");
        Migrator::up(&db, None).await?;
    }

    let persistence: Arc<dyn PersistenceService> = Arc::new(ExternalDbPersistService::new(db));
    persistence.health_check().await?;
    spawn_token_purge(persistence.clone());

    let address = configuration.server_address();
    let port = configuration.server_port();
    let app_state = Arc::new(AppState::new(configuration, persistence));

    info!(
        address = %address,
        port,
        base_url = app_state.base_url(),
        "starting AskMe server"
    );

    let server = startup::api_server(app_state, address, port)?;

    let shutdown_signal = startup::wait_for_shutdown_signal();
    startup::stop_on_signal(server.handle(), &shutdown_signal);

    server.await?;

    info!("AskMe server stopped");

    Ok(())
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let configuration = Configuration::new(&cli)?;

    let _logging_guard = startup::init_logging(&LoggingConfig::new(
        APP_NAME,
        configuration.log_level(),
        configuration.log_path(),
    ))?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(configuration).await?,
        Command::Migrate => {
            let db = configuration.database_connection().await?;
            Migrator::up(&db, None).await?;
            info!("migrations applied");
        }
        Command::CreateSuperuser {
            username,
            password,
            email,
        } => {
            let persistence = connect(&configuration).await?;
            command::create_superuser(
                persistence.as_ref(),
                &username,
                &password,
                email,
                configuration.bcrypt_cost(),
            )
            .await?;
        }
        Command::GenerateData {
            users,
            tags,
            questions,
            answers,
            likes,
        } => {
            let persistence = connect(&configuration).await?;
            let mut rng = StdRng::from_os_rng();
            let counts = GenerateCounts {
                users,
                tags,
                questions,
                answers,
                likes,
            };
            command::generate_data(
                persistence.as_ref(),
                counts,
                configuration.bcrypt_cost(),
                &mut rng,
            )
            .await?;
        }
    }

    Ok(())
}
