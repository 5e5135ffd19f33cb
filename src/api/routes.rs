use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::{
    handlers::{get_game, get_settings, reset_game, reveal, toggle_flag, AppState},
    middleware::{cors, logging},
};
use crate::config::ServerConfig;

pub fn create_router(server: &ServerConfig) -> Router<AppState> {
    let mut router = Router::new()
        .route("/api/game", get(get_game))
        .route("/api/game/reveal", post(reveal))
        .route("/api/game/flag", post(toggle_flag))
        .route("/api/game/reset", post(reset_game))
        .route("/api/settings", get(get_settings))
        .route("/health", get(health_check));

    if server.enable_cors {
        router = router.layer(middleware::from_fn(cors));
    }
    // 後に重ねた層が外側になるため、プリフライト応答もログに残る
    if server.enable_logging {
        router = router.layer(middleware::from_fn(logging));
    }

    router
}

async fn health_check() -> &'static str {
    "Minesweeper API Server is running"
}
