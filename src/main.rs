use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use cre_match::config::{LoggingSettings, Settings};
use cre_match::routes::{self, matches::AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging(settings: &LoggingSettings) {
    // LOG_LEVEL / LOG_FORMAT override the configured values; RUST_LOG wins over both
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.level.clone());
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.format.clone());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "json" => subscriber.json().init(),
        _ => subscriber.init(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_logging(&settings.logging);

    info!("Starting CRE match service...");

    let app_state = AppState::from_settings(&settings.matching);

    info!(
        "Matchers initialized (default mode: {:?}, max candidates: {}, permissive weights: {:?}, strict weights: {:?})",
        app_state.default_mode,
        app_state.max_candidates,
        app_state.permissive.config().weights,
        app_state.strict.config().weights
    );

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
