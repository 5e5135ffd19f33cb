//! アプリケーション全体のエラー定義モジュール
//! 盤面操作とゲームセッションのエラーを統一管理。

use thiserror::Error;

/// 盤面ロジックに関連するエラー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Position ({row}, {col}) is out of range for a {rows}x{cols} board")]
    OutOfRange {
        row: isize,
        col: isize,
        rows: usize,
        cols: usize,
    },

    #[error("Too many mines: {mines} requested but only {capacity} cells can hold one")]
    TooManyMines { mines: usize, capacity: usize },

    #[error("Invalid board dimensions: {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },
}

/// ゲームセッション（盤面所有タスク）に関連するエラー
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Game session is closed")]
    Closed,

    #[error("Game error: {source}")]
    Game {
        #[from]
        source: GameError,
    },
}

/// ゲームエラーをベースとした結果型
pub type Result<T> = std::result::Result<T, GameError>;

/// セッション操作の結果型
pub type SessionResult<T> = std::result::Result<T, SessionError>;
