//! ゲームセッション管理モジュール
//! 盤面を単一のタスクが所有し、全ての操作をキュー経由で1件ずつ処理する。
//! 複数のリクエストが同時に届いても盤面の不変条件が崩れない。

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::error::{SessionError, SessionResult};
use crate::game::{Board, FlagOutcome, GameState, RevealOutcome};

/// 操作キューのデフォルト容量
const DEFAULT_QUEUE_CAPACITY: usize = 64;

type Job = Box<dyn FnOnce(&mut Board) + Send>;

/// 盤面所有タスクへのハンドル
/// Cloneして複数のハンドラから共有できる
#[derive(Debug, Clone)]
pub struct GameSession {
    sender: mpsc::Sender<Job>,
}

impl GameSession {
    /// 盤面を所有するタスクを起動する
    /// tokioランタイム上で呼び出す必要がある
    pub fn spawn(board: Board) -> Self {
        Self::spawn_with_capacity(board, DEFAULT_QUEUE_CAPACITY)
    }

    /// キュー容量を指定して盤面所有タスクを起動する
    pub fn spawn_with_capacity(mut board: Board, capacity: usize) -> Self {
        let (sender, mut receiver) = mpsc::channel::<Job>(capacity.max(1));

        tokio::spawn(async move {
            let (rows, cols) = board.dimensions();
            info!(rows, cols, mines = board.mine_count(), "Game session started");

            while let Some(job) = receiver.recv().await {
                job(&mut board);
            }

            info!("Game session stopped");
        });

        Self { sender }
    }

    /// 盤面に対する処理をキューに積み、完了を待って結果を返す
    pub async fn execute<T, F>(&self, f: F) -> SessionResult<T>
    where
        F: FnOnce(&mut Board) -> T + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let job: Job = Box::new(move |board| {
            // 呼び出し側が待機をやめていれば結果は捨てる
            let _ = reply_tx.send(f(board));
        });

        self.sender.send(job).await.map_err(|_| SessionError::Closed)?;
        reply_rx.await.map_err(|_| SessionError::Closed)
    }

    pub async fn reveal(&self, row: isize, col: isize) -> SessionResult<RevealOutcome> {
        self.execute(move |board| board.reveal_at(row, col))
            .await?
            .map_err(SessionError::from)
    }

    pub async fn toggle_flag(&self, row: isize, col: isize) -> SessionResult<FlagOutcome> {
        self.execute(move |board| board.toggle_flag_at(row, col))
            .await?
            .map_err(SessionError::from)
    }

    pub async fn reset(&self) -> SessionResult<()> {
        self.execute(|board| board.reset()).await?;
        debug!("Session board reset");
        Ok(())
    }

    pub async fn state(&self) -> SessionResult<GameState> {
        self.execute(|board| board.state()).await
    }
}
