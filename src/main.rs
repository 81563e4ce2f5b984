use std::error::Error;
use std::sync::Arc;

use futures::future::FutureExt;
use warp::Filter;

use log::{info, initialize_logger, parse_level, warn};
use shipyard::config::{get_variable, get_variable_or, parse_variable};
use shipyard::db::memory::MemoryDb;
use shipyard::db::PgDb;
use shipyard::environment::{Config, Environment, SafeDb};
use shipyard::routes;
use shipyard::urls::Urls;

/// Connection string that selects the in-process store instead of Postgres.
const MEMORY_CONNECTION_STRING: &str = "memory";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    let logger = initialize_logger(parse_level(&get_variable_or("SHIPYARD_LOG_LEVEL", "info")));

    let main_port: u16 = parse_variable("SHIPYARD_PORT", &get_variable("SHIPYARD_PORT"));
    let admin_port: u16 =
        parse_variable("SHIPYARD_ADMIN_PORT", &get_variable("SHIPYARD_ADMIN_PORT"));

    info!(logger, "Starting..."; "main_port" => main_port, "admin_port" => admin_port);
    let logger = Arc::new(logger);

    let connection_string = get_variable("SHIPYARD_DB_CONNECTION_STRING");
    let db: Arc<SafeDb> = if connection_string == MEMORY_CONNECTION_STRING {
        warn!(logger, "Using in-memory storage; ships will not survive a restart");
        Arc::new(MemoryDb::new())
    } else {
        info!(logger, "Creating database pool...");
        let pool = sqlx::Pool::connect(&connection_string)
            .await
            .expect("create database pool from SHIPYARD_DB_CONNECTION_STRING");
        Arc::new(PgDb::new(pool))
    };

    let urls = Arc::new(Urls::new(
        get_variable("SHIPYARD_BASE_URL"),
        get_variable_or("SHIPYARD_SHIPS_PATH", "ships"),
    ));

    let config = Config::new(parse_variable(
        "SHIPYARD_DEFAULT_PAGE_SIZE",
        &get_variable_or("SHIPYARD_DEFAULT_PAGE_SIZE", "3"),
    ))
    .expect("SHIPYARD_DEFAULT_PAGE_SIZE must be at least 1");
    let environment = Environment::new(logger.clone(), db, urls, config);

    let should_terminate = {
        let logger = logger.clone();

        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(logger, "Failed to listen for Ctrl-C"; "error" => %e);
            }

            info!(logger, "Received termination signal");
        }
        .shared()
    };

    let main_server = {
        let should_terminate = should_terminate.clone();
        let logger2 = logger.clone();

        let routes = routes::make_ship_routes(environment.clone())
            .recover(move |r| routes::format_rejection(logger2.clone(), r));

        let (_, main_server) =
            warp::serve(routes).bind_with_graceful_shutdown(([0, 0, 0, 0], main_port), async {
                should_terminate.await;
            });

        main_server
    };

    let admin_server = {
        let should_terminate = should_terminate.clone();

        let routes = routes::admin::make_healthz_route(environment.clone());

        let (_, admin_server) =
            warp::serve(routes).bind_with_graceful_shutdown(([0, 0, 0, 0], admin_port), async {
                should_terminate.await;
            });

        admin_server
    };

    tokio::join!(main_server, admin_server);

    info!(logger, "Exiting gracefully...");

    Ok(())
}
