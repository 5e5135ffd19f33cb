//! マインスイーパーの盤面状態を管理するモジュール
//! 全マスの所有、遅延地雷配置、公開処理、勝敗判定を担当する。

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use super::cell::{Cell, CellView};
use super::rules::MinesweeperRules;
use super::types::{BoardSize, GameState, Position};
use crate::error::{GameError, Result};

/// reveal操作の結果
/// 何も起きなかった場合もエラーではなくNoChangeで返す
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed { count: usize },
    HitMine,
    /// countは勝利を決めたrevealで公開したマス数
    Won { count: usize },
}

impl RevealOutcome {
    pub fn has_update(self) -> bool {
        !matches!(self, RevealOutcome::NoChange)
    }
}

/// toggle_flag操作の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    Flagged,
    Unflagged,
}

/// R×Cのマインスイーパー盤面
/// マスの変更は全てこの構造体を経由し、公開数などの不変条件を保つ
#[derive(Debug, Clone)]
pub struct Board {
    size: BoardSize,
    mine_count: usize,
    cells: Vec<Cell>,
    mines_placed: bool,
    revealed_count: usize,
    state: GameState,
    rng: StdRng,
    /// with_minesで固定した地雷配置。resetのたびに再適用する
    fixed_mines: Option<Vec<Position>>,
}

impl Board {
    /// OSの乱数源で新しい盤面を作成する
    pub fn new(rows: usize, cols: usize, mine_count: usize) -> Result<Self> {
        Self::with_rng(rows, cols, mine_count, StdRng::from_os_rng())
    }

    /// シード固定の盤面を作成する（再現可能な地雷配置）
    pub fn with_seed(rows: usize, cols: usize, mine_count: usize, seed: u64) -> Result<Self> {
        Self::with_rng(rows, cols, mine_count, StdRng::seed_from_u64(seed))
    }

    fn with_rng(rows: usize, cols: usize, mine_count: usize, rng: StdRng) -> Result<Self> {
        let size = BoardSize::new(rows, cols)?;
        Self::validate_mine_count(size, mine_count)?;
        Ok(Self::blank(size, mine_count, rng))
    }

    /// 地雷配置を固定した盤面を作成する
    /// 最初のreveal時のランダム配置は行わず、reset後も同じ配置に戻る。
    /// 重複した座標は1個として数える
    pub fn with_mines(rows: usize, cols: usize, mines: &[(isize, isize)]) -> Result<Self> {
        let size = BoardSize::new(rows, cols)?;
        let mut positions = Vec::with_capacity(mines.len());
        for &(row, col) in mines {
            let pos = size.position(row, col)?;
            if !positions.contains(&pos) {
                positions.push(pos);
            }
        }

        let mut board = Self::blank(size, positions.len(), StdRng::from_os_rng());
        board.fixed_mines = Some(positions);
        board.apply_fixed_mines();
        Ok(board)
    }

    /// どの位置を最初にクリックしても地雷を置ききれるか事前に検証する
    pub fn validate_mine_count(size: BoardSize, mine_count: usize) -> Result<()> {
        let capacity = size.total_cells() - size.max_exclusion_zone();
        if mine_count > capacity {
            return Err(GameError::TooManyMines {
                mines: mine_count,
                capacity,
            });
        }
        Ok(())
    }

    fn blank(size: BoardSize, mine_count: usize, rng: StdRng) -> Self {
        Self {
            size,
            mine_count,
            cells: size.positions().map(Cell::new).collect(),
            mines_placed: false,
            revealed_count: 0,
            state: GameState::Playing,
            rng,
            fixed_mines: None,
        }
    }

    fn apply_fixed_mines(&mut self) {
        if let Some(mines) = &self.fixed_mines {
            MinesweeperRules::place_mines(&mut self.cells, self.size, mines);
            self.mines_placed = true;
        }
    }

    /// 指定した位置のマスを公開する
    pub fn reveal(&mut self, position: Position) -> Result<RevealOutcome> {
        self.ensure_in_bounds(position)?;

        if self.state != GameState::Playing {
            return Ok(RevealOutcome::NoChange);
        }

        let index = self.size.index_of(position);
        if self.cells[index].is_flagged() || self.cells[index].is_revealed() {
            return Ok(RevealOutcome::NoChange);
        }

        if !self.mines_placed {
            let mines = MinesweeperRules::place_random_mines(
                &mut self.cells,
                self.size,
                self.mine_count,
                position,
                &mut self.rng,
            )?;
            self.mines_placed = true;
            debug!(
                mines = mines.len(),
                row = position.row(),
                col = position.col(),
                "Mines placed around first reveal"
            );
        }

        let cell = &mut self.cells[index];
        if cell.is_mine() {
            cell.reveal();
            MinesweeperRules::reveal_all_mines(&mut self.cells);
            self.state = GameState::Lost;
            info!(row = position.row(), col = position.col(), "Mine hit, game lost");
            return Ok(RevealOutcome::HitMine);
        }

        let count = if cell.adjacent_mines() > 0 {
            cell.reveal();
            1
        } else {
            MinesweeperRules::flood_reveal(&mut self.cells, self.size, position)
        };
        self.revealed_count += count;

        if self.check_victory() {
            Ok(RevealOutcome::Won { count })
        } else {
            Ok(RevealOutcome::Revealed { count })
        }
    }

    /// 行・列の整数値から座標を作って公開する
    pub fn reveal_at(&mut self, row: isize, col: isize) -> Result<RevealOutcome> {
        let position = self.size.position(row, col)?;
        self.reveal(position)
    }

    /// 指定した位置の旗を切り替える
    /// 終局後や公開済みマスに対しては何もしない
    pub fn toggle_flag(&mut self, position: Position) -> Result<FlagOutcome> {
        self.ensure_in_bounds(position)?;

        if self.state != GameState::Playing {
            return Ok(FlagOutcome::NoChange);
        }

        let index = self.size.index_of(position);
        let cell = &mut self.cells[index];
        if cell.is_revealed() {
            return Ok(FlagOutcome::NoChange);
        }

        cell.toggle_flag();
        if cell.is_flagged() {
            Ok(FlagOutcome::Flagged)
        } else {
            Ok(FlagOutcome::Unflagged)
        }
    }

    /// 行・列の整数値から座標を作って旗を切り替える
    pub fn toggle_flag_at(&mut self, row: isize, col: isize) -> Result<FlagOutcome> {
        let position = self.size.position(row, col)?;
        self.toggle_flag(position)
    }

    /// 新しいラウンドのために盤面を初期化する
    /// 固定配置の盤面はその配置に戻し、それ以外は次のrevealまで地雷を置かない
    pub fn reset(&mut self) {
        self.mines_placed = false;
        self.revealed_count = 0;
        self.state = GameState::Playing;
        self.cells = self.size.positions().map(Cell::new).collect();
        self.apply_fixed_mines();
        debug!(rows = self.size.rows, cols = self.size.cols, "Board reset");
    }

    /// 勝利条件を満たしていれば状態をWonにし、全地雷を公開する
    fn check_victory(&mut self) -> bool {
        let total_to_reveal = self.size.total_cells() - self.mine_count;
        if self.revealed_count < total_to_reveal {
            return false;
        }

        self.state = GameState::Won;
        MinesweeperRules::reveal_all_mines(&mut self.cells);
        info!(revealed = self.revealed_count, "All safe cells revealed, game won");
        true
    }

    fn ensure_in_bounds(&self, position: Position) -> Result<()> {
        if self.size.contains(position) {
            Ok(())
        } else {
            Err(GameError::OutOfRange {
                row: position.row() as isize,
                col: position.col() as isize,
                rows: self.size.rows,
                cols: self.size.cols,
            })
        }
    }

    pub fn cell_at(&self, position: Position) -> Result<CellView> {
        self.ensure_in_bounds(position)?;
        Ok(self.cells[self.size.index_of(position)].view())
    }

    /// 全マスを行優先順で返す（読み取り専用）
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    /// 戻り値: (行数, 列数)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.size.rows, self.size.cols)
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed_count
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    pub fn flag_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_flagged()).count()
    }

    /// 画面表示用の残り地雷数（旗を立てすぎると負になる）
    pub fn remaining_mines(&self) -> isize {
        self.mine_count as isize - self.flag_count() as isize
    }

    /// デバッグ用の盤面表示文字列を生成する
    /// #で未公開、Fで旗、*で地雷、.で隣接数0、数字で隣接地雷数を表現
    pub fn display(&self) -> String {
        let mut result = String::with_capacity(self.cells.len() * 2 + self.size.rows);

        for row in self.cells.chunks(self.size.cols) {
            let line: Vec<String> = row
                .iter()
                .map(|cell| match (cell.is_revealed(), cell.is_flagged(), cell.is_mine()) {
                    (false, true, _) => "F".to_string(),
                    (false, false, _) => "#".to_string(),
                    (true, _, true) => "*".to_string(),
                    (true, _, false) if cell.adjacent_mines() == 0 => ".".to_string(),
                    (true, _, false) => cell.adjacent_mines().to_string(),
                })
                .collect();
            result.push_str(&line.join(" "));
            result.push('\n');
        }

        result
    }
}
