//! Watch list server.
//!
//! ```text
//! WATCHLIST_PASSWORD=movienight WATCHLIST_DB=watchlist.db cargo run
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};
use watchlist::{
    config::Config, http, telemetry, CollectionService, InMemoryModelStore, ModelStore,
    SharedPasswordGate,
};

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    info!(?config, "starting watchlist");

    let result = match &config.database_path {
        #[cfg(feature = "sqlite")]
        Some(path) => match watchlist::SqliteModelStore::open(path) {
            Ok(store) => run(store, &config).await,
            Err(e) => {
                error!(error = %e, path = %path.display(), "cannot open database");
                return ExitCode::FAILURE;
            }
        },
        #[cfg(not(feature = "sqlite"))]
        Some(path) => {
            error!(path = %path.display(), "built without sqlite support");
            return ExitCode::FAILURE;
        }
        None => {
            info!("no WATCHLIST_DB set, movies are kept in memory");
            run(InMemoryModelStore::new(), &config).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "server stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run<S: ModelStore + 'static>(store: S, config: &Config) -> Result<(), std::io::Error> {
    let gate = SharedPasswordGate::new(config.shared_password.clone())
        .with_ttl(chrono::Duration::days(config.session_ttl_days));
    let service = Arc::new(CollectionService::new(store, Arc::new(gate)));
    http::serve(service, &config.bind_addr).await
}
