//! 設定システム統合テスト

use std::{env, fs};
use tempfile::TempDir;

use minesweeper::{
    api::dto::SettingsResponse,
    config::{BoardConfig, Config, ConfigError, DisplayConfig, ServerConfig},
    game::GameState,
    GameError,
};

fn create_test_config() -> Config {
    Config {
        board: BoardConfig {
            rows: 9,
            cols: 9,
            mines: 10,
            seed: Some(1234),
        },
        display: DisplayConfig {
            title: "Beginner".to_string(),
            cell_size: 32,
        },
        server: ServerConfig {
            port: 4000,
            host: "127.0.0.1".to_string(),
            enable_cors: false,
            enable_logging: false,
        },
    }
}

#[test]
fn test_config_serialization_deserialization() {
    let config = create_test_config();

    let json_str = serde_json::to_string_pretty(&config).unwrap();
    assert!(json_str.contains("4000"));
    assert!(json_str.contains("127.0.0.1"));
    assert!(json_str.contains("1234"));

    let deserialized: Config = serde_json::from_str(&json_str).unwrap();
    assert_eq!(deserialized, config);
}

#[test]
fn test_config_file_operations() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("test_config.json");

    let original_config = create_test_config();

    // ファイルに保存
    original_config.save_to_file(&config_path).unwrap();
    assert!(config_path.exists());

    // ファイルから読み込み
    let loaded_config = Config::from_file(&config_path).unwrap();
    assert_eq!(loaded_config.board, original_config.board);
    assert_eq!(loaded_config.server.port, original_config.server.port);
}

#[test]
fn test_config_file_errors() {
    let temp_dir = TempDir::new().unwrap();

    let missing = Config::from_file(temp_dir.path().join("missing.json"));
    assert!(matches!(missing, Err(ConfigError::FileReadError(_))));

    let broken_path = temp_dir.path().join("broken.json");
    fs::write(&broken_path, "{ not json").unwrap();
    assert!(matches!(
        Config::from_file(&broken_path),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn test_config_validation() {
    let mut config = Config::default();

    // 有効な設定
    assert!(config.validate().is_ok());

    // 無効なポート
    config.server.port = 0;
    assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { .. })));

    // 地雷が多すぎる
    config.server.port = 3000;
    config.board.mines = config.board.rows * config.board.cols;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Board(GameError::TooManyMines { .. }))
    ));

    // 空の盤面
    config.board = BoardConfig {
        rows: 0,
        cols: 10,
        mines: 0,
        seed: None,
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Board(GameError::InvalidDimensions { rows: 0, cols: 10 }))
    ));
}

#[test]
fn test_env_var_config_loading() {
    env::set_var("MINESWEEPER_ROWS", "8");
    env::set_var("MINESWEEPER_COLS", "12");
    env::set_var("MINESWEEPER_MINES", "15");
    env::set_var("MINESWEEPER_SEED", "99");
    env::set_var("SERVER_PORT", "5000");
    env::set_var("SERVER_HOST", "192.168.1.100");

    let config = Config::from_env().unwrap();

    assert_eq!(config.board.rows, 8);
    assert_eq!(config.board.cols, 12);
    assert_eq!(config.board.mines, 15);
    assert_eq!(config.board.seed, Some(99));
    assert_eq!(config.server.port, 5000);
    assert_eq!(config.server.host, "192.168.1.100");
    // 未設定の値はデフォルトのまま
    assert_eq!(config.display, DisplayConfig::default());

    env::set_var("MINESWEEPER_MINES", "many");
    assert!(matches!(
        Config::from_env(),
        Err(ConfigError::EnvVarError { ref name, .. }) if name == "MINESWEEPER_MINES"
    ));

    env::remove_var("MINESWEEPER_ROWS");
    env::remove_var("MINESWEEPER_COLS");
    env::remove_var("MINESWEEPER_MINES");
    env::remove_var("MINESWEEPER_SEED");
    env::remove_var("SERVER_PORT");
    env::remove_var("SERVER_HOST");
}

#[test]
fn test_seeded_config_builds_reproducible_boards() {
    let config = create_test_config();

    let mut first = config.board.build_board().unwrap();
    let mut second = config.board.build_board().unwrap();
    first.reveal_at(4, 4).unwrap();
    second.reveal_at(4, 4).unwrap();

    assert_eq!(first.display(), second.display());
    assert_ne!(first.state(), GameState::Lost);
}

#[test]
fn test_settings_response_reflects_config() {
    let settings = SettingsResponse::from(&create_test_config());

    assert_eq!(settings.title, "Beginner");
    assert_eq!(settings.window_width, 9 * 32);
    assert_eq!(settings.window_height, 9 * 32);
    assert_eq!(settings.mines, 10);
}
