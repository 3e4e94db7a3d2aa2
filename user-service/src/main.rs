use anyhow::Result;
use user_service::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config)?;

    let result = match config.database.clone() {
        #[cfg(feature = "database")]
        Some(database) => {
            let pool = create_pool(&database).await?;
            run(config, PgUserRepository::new(pool)).await
        }
        #[cfg(not(feature = "database"))]
        Some(_) => {
            tracing::warn!(
                "Database configured but the `database` feature is disabled, keeping users in memory"
            );
            run(config, InMemoryUserRepository::new()).await
        }
        None => {
            tracing::info!("No database configured, keeping users in memory");
            run(config, InMemoryUserRepository::new()).await
        }
    };

    shutdown_tracing();
    result
}

async fn run<R: UserRepository>(config: Config, repository: R) -> Result<()> {
    let state = AppState::new(config.clone(), repository);
    Server::new(config).serve(router(state)).await?;
    Ok(())
}
