//! 盤面の1マスを表すモジュール
//! 地雷・旗・公開状態・隣接地雷数を保持し、盤面(Board)からのみ変更される。

use serde::Serialize;

use super::types::Position;

/// 盤面の1マス
/// 変更系メソッドはクレート内部(Board)専用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    position: Position,
    is_mine: bool,
    adjacent_mines: u8,
    is_revealed: bool,
    is_flagged: bool,
}

impl Cell {
    /// 地雷なし・未公開・旗なし・隣接数0の新しいマスを作成する
    pub(crate) fn new(position: Position) -> Self {
        Self {
            position,
            is_mine: false,
            adjacent_mines: 0,
            is_revealed: false,
            is_flagged: false,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_mine(&self) -> bool {
        self.is_mine
    }

    pub fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    pub fn is_revealed(&self) -> bool {
        self.is_revealed
    }

    pub fn is_flagged(&self) -> bool {
        self.is_flagged
    }

    pub(crate) fn place_mine(&mut self) {
        self.is_mine = true;
    }

    pub(crate) fn reveal(&mut self) {
        self.is_revealed = true;
    }

    /// 旗を反転する
    /// 公開済みのマスでは何もしない
    pub(crate) fn toggle_flag(&mut self) {
        if !self.is_revealed {
            self.is_flagged = !self.is_flagged;
        }
    }

    /// 地雷配置時にのみ呼ばれる
    pub(crate) fn increment_adjacent_mines(&mut self) {
        debug_assert!(self.adjacent_mines < 8);
        self.adjacent_mines += 1;
    }

    /// 描画層に渡す読み取り専用スナップショットを作成する
    pub fn view(&self) -> CellView {
        CellView {
            position: self.position,
            is_mine: self.is_mine,
            adjacent_mines: self.adjacent_mines,
            is_revealed: self.is_revealed,
            is_flagged: self.is_flagged,
        }
    }
}

/// マスの読み取り専用スナップショット
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellView {
    pub position: Position,
    pub is_mine: bool,
    pub adjacent_mines: u8,
    pub is_revealed: bool,
    pub is_flagged: bool,
}
