//! ゲームの基本型定義モジュール
//! 盤面サイズ、座標、近傍イテレータ、ゲーム進行状態を定義する。

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// 近傍8マスへの移動ベクトル
/// 行優先順（中心を除く）で並べる
const DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1), (-1, 0), (-1, 1),  // 左上、上、右上
    (0, -1),           (0, 1),   // 左、右
    (1, -1),  (1, 0),  (1, 1),   // 左下、下、右下
];

/// 盤面の大きさ（行数×列数）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BoardSize {
    pub rows: usize,
    pub cols: usize,
}

impl BoardSize {
    /// 行・列ともに1以上でなければエラーを返す
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GameError::InvalidDimensions { rows, cols });
        }
        rows.checked_mul(cols)
            .ok_or(GameError::InvalidDimensions { rows, cols })?;
        Ok(Self { rows, cols })
    }

    /// 盤面の総マス数
    pub fn total_cells(&self) -> usize {
        self.rows * self.cols
    }

    /// 座標がこの盤面の範囲内かチェックする
    pub fn contains(&self, position: Position) -> bool {
        position.row < self.rows && position.col < self.cols
    }

    /// 範囲チェック付きで座標を生成する
    pub fn position(&self, row: isize, col: isize) -> Result<Position> {
        Position::new(row, col, *self)
    }

    /// 盤面上の全座標を行優先順で列挙する
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let cols = self.cols;
        (0..self.total_cells()).map(move |index| Position {
            row: index / cols,
            col: index % cols,
        })
    }

    /// 最初のクリックで除外されうる最大マス数（クリック位置と近傍）
    pub fn max_exclusion_zone(&self) -> usize {
        self.rows.min(3) * self.cols.min(3)
    }

    pub(crate) fn index_of(&self, position: Position) -> usize {
        position.row * self.cols + position.col
    }
}

/// 盤面上の座標を表す構造体
/// 生成時に盤面サイズで範囲検証されるため、生成後は不変
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    row: usize,
    col: usize,
}

impl Position {
    /// 範囲チェック付きのコンストラクタ
    /// 負の値や盤面外の座標はOutOfRangeエラー
    pub fn new(row: isize, col: isize, size: BoardSize) -> Result<Self> {
        let out_of_range = GameError::OutOfRange {
            row,
            col,
            rows: size.rows,
            cols: size.cols,
        };
        let r = usize::try_from(row).map_err(|_| out_of_range)?;
        let c = usize::try_from(col).map_err(|_| out_of_range)?;
        if r >= size.rows || c >= size.cols {
            return Err(out_of_range);
        }
        Ok(Self { row: r, col: c })
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    /// 盤面内に収まる近傍座標（最大8個）を返す
    pub fn neighbors(&self, size: BoardSize) -> Neighbors {
        Neighbors {
            center: *self,
            size,
            index: 0,
        }
    }
}

/// 近傍座標のイテレータ
/// Cloneすれば同じ列挙を最初からやり直せる
#[derive(Debug, Clone)]
pub struct Neighbors {
    center: Position,
    size: BoardSize,
    index: usize,
}

impl Iterator for Neighbors {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        while let Some(&(dr, dc)) = DIRECTIONS.get(self.index) {
            self.index += 1;

            let Some(row) = self.center.row.checked_add_signed(dr) else {
                continue;
            };
            let Some(col) = self.center.col.checked_add_signed(dc) else {
                continue;
            };
            if row < self.size.rows && col < self.size.cols {
                return Some(Position { row, col });
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(DIRECTIONS.len().saturating_sub(self.index)))
    }
}

/// ゲームの進行状態を表すenum
/// WonとLostは終端状態で、リセットまで盤面操作を受け付けない
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    Playing,
    Won,
    Lost,
}

impl GameState {
    /// 終端状態（勝利または敗北）かチェックする
    pub fn is_terminal(self) -> bool {
        matches!(self, GameState::Won | GameState::Lost)
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::Playing
    }
}
