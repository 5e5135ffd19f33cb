//! アプリケーション設定管理モジュール
//! 盤面サイズ、地雷数、表示設定、サーバー設定を
//! 設定ファイルと環境変数から読み込んで管理する。

use serde::{Deserialize, Serialize};
use std::{
    env::{self, VarError},
    fs,
    path::Path,
    str::FromStr,
};

use crate::error::GameError;
use crate::game::{Board, BoardSize};

/// 設定ファイルの探索順
const CONFIG_SEARCH_PATHS: [&str; 3] = [
    "config.json",
    "config/minesweeper.json",
    "/etc/minesweeper/config.json",
];

/// 盤面の設定を管理する構造体
/// 行数、列数、地雷数、乱数シードを含む
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub rows: usize,
    pub cols: usize,
    pub mines: usize,
    /// 指定すると地雷配置が再現可能になる
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rows: 16,
            cols: 20,
            mines: 45,
            seed: None,
        }
    }
}

impl BoardConfig {
    /// 盤面サイズと地雷数をゲーム開始前に検証する
    pub fn validate(&self) -> Result<(), GameError> {
        let size = BoardSize::new(self.rows, self.cols)?;
        Board::validate_mine_count(size, self.mines)
    }

    /// この設定で盤面を作成する
    pub fn build_board(&self) -> Result<Board, GameError> {
        match self.seed {
            Some(seed) => Board::with_seed(self.rows, self.cols, self.mines, seed),
            None => Board::new(self.rows, self.cols, self.mines),
        }
    }
}

/// 描画層向けの表示設定
/// 1マスのピクセルサイズとウィンドウタイトル
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub title: String,
    pub cell_size: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "Minesweeper".to_string(),
            cell_size: 60,
        }
    }
}

/// サーバーの設定を管理する構造体
/// ポート番号、ホスト名、CORS設定などを含む
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub enable_cors: bool,
    pub enable_logging: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
            enable_cors: true,
            enable_logging: true,
        }
    }
}

/// アプリケーションの全設定を統合するメイン設定構造体
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// 設定関連のエラーを表すenum
/// ファイル読み込み、パース、検証エラーなどを含む
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("設定ファイル読み込みエラー: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("設定ファイル解析エラー: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("環境変数エラー: {name} = {value}")]
    EnvVarError { name: String, value: String },

    #[error("設定値が無効です: {field} = {value}")]
    InvalidValue { field: String, value: String },

    #[error("盤面設定エラー: {0}")]
    Board(#[from] GameError),
}

/// 環境変数を読み取り、設定されていればパースして返す
/// UTF-8でない値は未設定扱いにせずエラーにする
fn env_value<T: FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarError {
                name: name.to_string(),
                value,
            }),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(raw)) => Err(ConfigError::EnvVarError {
            name: name.to_string(),
            value: raw.to_string_lossy().into_owned(),
        }),
    }
}

impl Config {
    /// 指定したファイルパスから設定を読み込む
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 環境変数から設定を読み込む
    /// デフォルト値をベースに環境変数で上書きする
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// 設定済みの環境変数だけで現在の値を上書きする
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(rows) = env_value("MINESWEEPER_ROWS")? {
            self.board.rows = rows;
        }
        if let Some(cols) = env_value("MINESWEEPER_COLS")? {
            self.board.cols = cols;
        }
        if let Some(mines) = env_value("MINESWEEPER_MINES")? {
            self.board.mines = mines;
        }
        if let Some(seed) = env_value("MINESWEEPER_SEED")? {
            self.board.seed = Some(seed);
        }
        if let Some(cell_size) = env_value("MINESWEEPER_CELL_SIZE")? {
            self.display.cell_size = cell_size;
        }
        if let Some(host) = env_value("SERVER_HOST")? {
            self.server.host = host;
        }
        if let Some(port) = env_value("SERVER_PORT")? {
            self.server.port = port;
        }
        Ok(())
    }

    /// 設定ファイルと環境変数を結合して設定を読み込む
    /// 設定ファイルがなくてもデフォルト値で動作する
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match CONFIG_SEARCH_PATHS.iter().find(|path| Path::new(path).exists()) {
            Some(path) => Self::from_file(path)?,
            None => Config::default(),
        };

        config.apply_env()?;
        Ok(config)
    }

    /// 現在の設定を指定したファイルに保存する
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 設定値の妥当性をチェックする
    /// 盤面設定はここで検証し、ゲーム開始前に不正な地雷数を弾く
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                value: self.server.port.to_string(),
            });
        }

        if self.display.cell_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "display.cell_size".to_string(),
                value: self.display.cell_size.to_string(),
            });
        }

        self.board.validate()?;
        Ok(())
    }

    /// ウィンドウ幅（ピクセル）
    pub fn window_width(&self) -> u64 {
        self.board.cols as u64 * u64::from(self.display.cell_size)
    }

    /// ウィンドウ高さ（ピクセル）
    pub fn window_height(&self) -> u64 {
        self.board.rows as u64 * u64::from(self.display.cell_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.board.rows, 16);
        assert_eq!(config.board.cols, 20);
        assert_eq!(config.board.mines, 45);
        assert_eq!(config.window_width(), 1200);
        assert_eq!(config.window_height(), 960);
    }

    #[test]
    fn test_validate_rejects_too_many_mines() {
        let mut config = Config::default();
        config.board = BoardConfig {
            rows: 3,
            cols: 3,
            mines: 1,
            seed: None,
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Board(GameError::TooManyMines { mines: 1, capacity: 0 }))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_cell_size() {
        let mut config = Config::default();
        config.display.cell_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_build_board_with_seed() {
        let board_config = BoardConfig {
            rows: 5,
            cols: 6,
            mines: 4,
            seed: Some(11),
        };

        let board = board_config.build_board().unwrap();
        assert_eq!(board.dimensions(), (5, 6));
        assert_eq!(board.mine_count(), 4);
    }

    #[test]
    fn test_env_value_unset_is_none() {
        let value: Option<usize> = env_value("MINESWEEPER_TEST_UNSET_VALUE").unwrap();
        assert_eq!(value, None);
    }

    #[cfg(unix)]
    #[test]
    fn test_env_value_rejects_non_unicode() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let name = "MINESWEEPER_TEST_NON_UNICODE";
        env::set_var(name, OsStr::from_bytes(&[b'1', 0x80]));
        let result = env_value::<usize>(name);
        env::remove_var(name);

        assert!(matches!(
            result,
            Err(ConfigError::EnvVarError { name: ref var, .. }) if var == name
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"board": {"rows": 9, "cols": 9, "mines": 10}}"#).unwrap();
        assert_eq!(config.board.rows, 9);
        assert_eq!(config.board.seed, None);
        assert_eq!(config.server, ServerConfig::default());
        assert_eq!(config.display, DisplayConfig::default());
    }
}
