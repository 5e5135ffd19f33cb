//! マインスイーパーAPIサーバーのエントリポイント
//! 設定読み込み、盤面セッション起動、HTTPサーバー起動を行う。

use std::process::ExitCode;

use minesweeper::{
    api::{create_router, AppState},
    config::Config,
};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// メイン関数 - サーバーの初期化と起動を担当
#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if std::env::args().any(|arg| arg == "--generate-config") {
        return match Config::default().save_to_file("config.json") {
            Ok(()) => {
                info!("Default configuration written to config.json");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("Failed to write config.json: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    // 設定ファイルと環境変数から統合設定を読み込み
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        error!("Generate a default one with: cargo run -- --generate-config");
        return ExitCode::FAILURE;
    }

    info!(
        rows = config.board.rows,
        cols = config.board.cols,
        mines = config.board.mines,
        seeded = config.board.seed.is_some(),
        "Configuration loaded"
    );

    let state = match AppState::new(&config) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to create board: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let app = create_router(&config.server).with_state(state);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let listener = match TcpListener::bind(&bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", bind_address, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Minesweeper API server listening on {}", bind_address);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
