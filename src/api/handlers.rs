use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

use super::dto::{
    ErrorResponse, FlagResponse, GameResponse, PositionRequest, RevealResponse, SettingsResponse,
};
use crate::{
    config::Config,
    error::{GameError, Result as GameResult, SessionError},
    game::Board,
    session::GameSession,
};

type ApiResult<T> = std::result::Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

#[derive(Debug, Clone)]
pub struct AppState {
    pub session: GameSession,
    pub settings: Arc<SettingsResponse>,
}

impl AppState {
    /// 設定から盤面を作成し、盤面所有タスクを起動する
    /// tokioランタイム上で呼び出す必要がある
    pub fn new(config: &Config) -> std::result::Result<Self, GameError> {
        let board = config.board.build_board()?;

        Ok(Self {
            session: GameSession::spawn(board),
            settings: Arc::new(SettingsResponse::from(config)),
        })
    }
}

fn error_response(error: SessionError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &error {
        SessionError::Game { source: GameError::OutOfRange { .. } } => StatusCode::BAD_REQUEST,
        SessionError::Game { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        SessionError::Closed => StatusCode::SERVICE_UNAVAILABLE,
    };

    let error_msg = match status {
        StatusCode::BAD_REQUEST => "Invalid position",
        StatusCode::SERVICE_UNAVAILABLE => "Game session unavailable",
        _ => "Board configuration error",
    };

    (
        status,
        Json(ErrorResponse {
            error: error_msg.to_string(),
            details: Some(error.to_string()),
        }),
    )
}

pub async fn get_game(State(state): State<AppState>) -> ApiResult<GameResponse> {
    state
        .session
        .execute(|board| GameResponse::from_board(board))
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn reveal(
    State(state): State<AppState>,
    Json(payload): Json<PositionRequest>,
) -> ApiResult<RevealResponse> {
    let PositionRequest { row, col } = payload;

    state
        .session
        .execute(move |board: &mut Board| -> GameResult<RevealResponse> {
            let outcome = board.reveal_at(row, col)?;
            Ok(RevealResponse::new(outcome, board))
        })
        .await
        .and_then(|result| result.map_err(SessionError::from))
        .map(Json)
        .map_err(error_response)
}

pub async fn toggle_flag(
    State(state): State<AppState>,
    Json(payload): Json<PositionRequest>,
) -> ApiResult<FlagResponse> {
    let PositionRequest { row, col } = payload;

    state
        .session
        .execute(move |board: &mut Board| -> GameResult<FlagResponse> {
            let outcome = board.toggle_flag_at(row, col)?;
            Ok(FlagResponse::new(outcome, board))
        })
        .await
        .and_then(|result| result.map_err(SessionError::from))
        .map(Json)
        .map_err(error_response)
}

pub async fn reset_game(State(state): State<AppState>) -> ApiResult<GameResponse> {
    state
        .session
        .execute(|board| {
            board.reset();
            GameResponse::from_board(board)
        })
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn get_settings(State(state): State<AppState>) -> Json<SettingsResponse> {
    Json(state.settings.as_ref().clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_status_mapping() {
        let out_of_range = SessionError::from(GameError::OutOfRange {
            row: -1,
            col: 0,
            rows: 3,
            cols: 3,
        });
        assert_eq!(error_response(out_of_range).0, StatusCode::BAD_REQUEST);

        let too_many = SessionError::from(GameError::TooManyMines { mines: 5, capacity: 0 });
        assert_eq!(error_response(too_many).0, StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(
            error_response(SessionError::Closed).0,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_app_state_creation() {
        let state = AppState::new(&Config::default()).unwrap();
        assert_eq!(state.settings.rows, 16);
        assert_eq!(state.session.execute(|b| b.mine_count()).await.unwrap(), 45);
    }
}
