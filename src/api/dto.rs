//! API入出力のデータ構造定義モジュール
//! 盤面スナップショットを描画層向けのJSONに変換する。
//! 未公開マスの地雷情報はレスポンスに含めない。

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::game::{Board, Cell, FlagOutcome, GameState, RevealOutcome};

/// 描画層から見たマスの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CellResponse {
    Hidden,
    Flagged,
    Revealed { adjacent: u8 },
    Mine,
}

impl From<&Cell> for CellResponse {
    fn from(cell: &Cell) -> Self {
        match (cell.is_revealed(), cell.is_flagged(), cell.is_mine()) {
            (false, true, _) => CellResponse::Flagged,
            (false, false, _) => CellResponse::Hidden,
            (true, _, true) => CellResponse::Mine,
            (true, _, false) => CellResponse::Revealed {
                adjacent: cell.adjacent_mines(),
            },
        }
    }
}

/// 盤面全体のスナップショット
#[derive(Debug, Clone, Serialize)]
pub struct GameResponse {
    pub rows: usize,
    pub cols: usize,
    pub mines: usize,
    pub remaining_mines: isize,
    pub revealed_count: usize,
    pub state: GameState,
    pub board: Vec<Vec<CellResponse>>,
}

impl GameResponse {
    pub fn from_board(board: &Board) -> Self {
        let (rows, cols) = board.dimensions();
        let cells = board
            .cells()
            .chunks(cols)
            .map(|row| row.iter().map(CellResponse::from).collect())
            .collect();

        Self {
            rows,
            cols,
            mines: board.mine_count(),
            remaining_mines: board.remaining_mines(),
            revealed_count: board.revealed_count(),
            state: board.state(),
            board: cells,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RevealResponse {
    /// "no_change" / "revealed" / "hit_mine" / "won"
    pub outcome: String,
    pub revealed: usize,
    pub game: GameResponse,
}

impl RevealResponse {
    pub fn new(outcome: RevealOutcome, board: &Board) -> Self {
        let (label, revealed) = match outcome {
            RevealOutcome::NoChange => ("no_change", 0),
            RevealOutcome::Revealed { count } => ("revealed", count),
            RevealOutcome::HitMine => ("hit_mine", 0),
            RevealOutcome::Won { count } => ("won", count),
        };

        Self {
            outcome: label.to_string(),
            revealed,
            game: GameResponse::from_board(board),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FlagResponse {
    /// "no_change" / "flagged" / "unflagged"
    pub outcome: String,
    pub game: GameResponse,
}

impl FlagResponse {
    pub fn new(outcome: FlagOutcome, board: &Board) -> Self {
        let label = match outcome {
            FlagOutcome::NoChange => "no_change",
            FlagOutcome::Flagged => "flagged",
            FlagOutcome::Unflagged => "unflagged",
        };

        Self {
            outcome: label.to_string(),
            game: GameResponse::from_board(board),
        }
    }
}

/// 描画層が盤面を描くための設定値
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsResponse {
    pub title: String,
    pub rows: usize,
    pub cols: usize,
    pub mines: usize,
    pub cell_size: u32,
    pub window_width: u64,
    pub window_height: u64,
}

impl From<&Config> for SettingsResponse {
    fn from(config: &Config) -> Self {
        Self {
            title: config.display.title.clone(),
            rows: config.board.rows,
            cols: config.board.cols,
            mines: config.board.mines,
            cell_size: config.display.cell_size,
            window_width: config.window_width(),
            window_height: config.window_height(),
        }
    }
}

/// reveal/flag共通のリクエスト
/// 負の値も受け取り、範囲外として400を返す
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PositionRequest {
    pub row: isize,
    pub col: isize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_response_hides_unrevealed_mines() {
        let board = Board::with_mines(2, 2, &[(0, 0)]).unwrap();
        let response = GameResponse::from_board(&board);

        assert_eq!(response.rows, 2);
        assert_eq!(response.cols, 2);
        assert_eq!(response.state, GameState::Playing);
        assert!(response
            .board
            .iter()
            .flatten()
            .all(|cell| *cell == CellResponse::Hidden));
    }

    #[test]
    fn test_game_response_after_loss_shows_mines() {
        let mut board = Board::with_mines(2, 2, &[(0, 0)]).unwrap();
        board.toggle_flag_at(1, 1).unwrap();
        let outcome = board.reveal_at(0, 0).unwrap();
        let response = RevealResponse::new(outcome, &board);

        assert_eq!(response.outcome, "hit_mine");
        assert_eq!(response.game.state, GameState::Lost);
        assert_eq!(response.game.board[0][0], CellResponse::Mine);
        assert_eq!(response.game.board[1][1], CellResponse::Flagged);
        assert_eq!(response.game.board[0][1], CellResponse::Hidden);
    }

    #[test]
    fn test_winning_reveal_reports_flood_count() {
        let mut board = Board::with_mines(3, 3, &[(2, 2)]).unwrap();
        let outcome = board.reveal_at(0, 0).unwrap();
        let response = RevealResponse::new(outcome, &board);

        assert_eq!(response.outcome, "won");
        assert_eq!(response.revealed, 8);
        assert_eq!(response.game.revealed_count, 8);
    }

    #[test]
    fn test_cell_response_serialization() {
        let json = serde_json::to_value(CellResponse::Revealed { adjacent: 3 }).unwrap();
        assert_eq!(json["Revealed"]["adjacent"], 3);
        assert_eq!(serde_json::to_value(CellResponse::Hidden).unwrap(), "Hidden");
    }

    #[test]
    fn test_settings_response_from_config() {
        let settings = SettingsResponse::from(&Config::default());
        assert_eq!(settings.title, "Minesweeper");
        assert_eq!(settings.window_width, 1200);
        assert_eq!(settings.window_height, 960);
    }
}
