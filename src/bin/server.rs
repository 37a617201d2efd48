use bitpos::auth::TokenKeys;
use bitpos::config::{self, CliArgs};
use bitpos::{create_app, db, logging, run_migrations, seed};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads them
    dotenv::dotenv().ok();

    let args = CliArgs::parse();
    let debug = args.debug;
    let run_seed = args.seed;

    let log_dir = config::get_config_dir_path();
    let _guard = logging::init_logging(debug, log_dir.as_deref());

    let config = config::get_config(args).map_err(|e| {
        error!("Invalid configuration: {}", e);
        anyhow::anyhow!(e)
    })?;

    let pool = Arc::new(db::init_pool(&config.database_url)?);
    {
        let mut conn = pool.get()?;
        run_migrations(&mut conn)?;
    }
    info!("Database ready at {}", config.database_url);

    if run_seed {
        let seeded = seed::seed_demo_data(&pool)?;
        info!(
            "Demo logins: {} / {} and {} / {}",
            seeded.vendor.get_email(),
            seed::DEMO_PASSWORD,
            seeded.customer.get_email(),
            seed::DEMO_PASSWORD
        );
    }

    let keys = TokenKeys::new(&config.jwt_secret, config.token_ttl_hours);
    let app = create_app(pool, keys);

    let address = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Listening on {}", address);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
