use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::sync::{Arc, Mutex};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use checkers_core::Database;

mod config;
mod routes;

use config::Config;

pub struct AppState {
    pub db: Mutex<Database>,
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([header::CONTENT_TYPE])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]);

    Router::new()
        .route("/games", get(routes::games::list_games).post(routes::games::create_game))
        .route("/games/:id", get(routes::games::get_game).put(routes::games::play_move))
        .route("/games/:id/moves", get(routes::games::legal_moves))
        .route("/stats", get(routes::stats))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(config.environment.log_level())
        .init();

    let db = Database::open(&config.database_path).expect("Failed to open database");

    let state = Arc::new(AppState {
        db: Mutex::new(db),
    });

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind address");

    info!(
        env = config.environment.as_str(),
        database = %config.database_path,
        "Server running at http://{}",
        config.bind_addr
    );

    axum::serve(listener, app).await.expect("Server error");
}
