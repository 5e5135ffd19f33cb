//! マインスイーパーのルールとゲームロジック実装モジュール
//! 地雷の配置、隣接地雷数の計算、連鎖公開(フラッドフィル)を担当する。

use std::collections::{HashSet, VecDeque};

use rand::seq::SliceRandom;
use rand::Rng;

use super::cell::Cell;
use super::types::{BoardSize, Position};
use crate::error::{GameError, Result};

/// マインスイーパーのルールを実装する構造体
/// スタティックメソッドのみを提供する
pub struct MinesweeperRules;

impl MinesweeperRules {
    /// 最初にクリックされた位置とその近傍を除外した地雷候補を返す
    pub fn mine_candidates(size: BoardSize, start: Position) -> Vec<Position> {
        let excluded: HashSet<Position> = std::iter::once(start)
            .chain(start.neighbors(size))
            .collect();

        size.positions()
            .filter(|pos| !excluded.contains(pos))
            .collect()
    }

    /// 除外領域を避けて地雷を一様ランダムに配置し、隣接数を計算する
    /// 候補数が足りない場合は盤面を変更せずにエラーを返す
    pub fn place_random_mines<R: Rng + ?Sized>(
        cells: &mut [Cell],
        size: BoardSize,
        mine_count: usize,
        start: Position,
        rng: &mut R,
    ) -> Result<Vec<Position>> {
        let mut candidates = Self::mine_candidates(size, start);

        if mine_count > candidates.len() {
            return Err(GameError::TooManyMines {
                mines: mine_count,
                capacity: candidates.len(),
            });
        }

        candidates.shuffle(rng);
        candidates.truncate(mine_count);

        Self::place_mines(cells, size, &candidates);
        Ok(candidates)
    }

    /// 指定位置に地雷を置き、周囲の非地雷マスの隣接数を加算する
    pub fn place_mines(cells: &mut [Cell], size: BoardSize, mines: &[Position]) {
        for &mine in mines {
            cells[size.index_of(mine)].place_mine();
        }

        for &mine in mines {
            for neighbor in mine.neighbors(size) {
                let cell = &mut cells[size.index_of(neighbor)];
                if !cell.is_mine() {
                    cell.increment_adjacent_mines();
                }
            }
        }
    }

    /// 幅優先探索で隣接数0の領域とその境界の数字マスを公開する
    /// 戻り値は新たに公開したマス数。地雷は決して公開しない
    pub fn flood_reveal(cells: &mut [Cell], size: BoardSize, start: Position) -> usize {
        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        let mut newly_revealed = 0;

        while let Some(current) = queue.pop_front() {
            let cell = &mut cells[size.index_of(current)];

            if cell.is_flagged() || cell.is_revealed() {
                continue;
            }

            cell.reveal();
            newly_revealed += 1;

            // 数字マスは公開するが、そこから先へは広げない
            if cell.adjacent_mines() > 0 {
                continue;
            }

            for neighbor in current.neighbors(size) {
                if visited.contains(&neighbor) || cells[size.index_of(neighbor)].is_mine() {
                    continue;
                }
                visited.insert(neighbor);
                queue.push_back(neighbor);
            }
        }

        newly_revealed
    }

    /// 全ての地雷マスを公開する（終局表示用）
    pub fn reveal_all_mines(cells: &mut [Cell]) {
        for cell in cells.iter_mut().filter(|cell| cell.is_mine()) {
            cell.reveal();
        }
    }
}
