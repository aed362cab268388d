//! クリーニングサイクル開始ハンドラ

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use shoelocker_domain::session::{LockerSession, SessionStatus};
use shoelocker_shared::ApiResponse;

use crate::{
    error::ApiError,
    usecase::{StartWorkInput, StartWorkUseCase},
};

/// start-work リクエスト
///
/// 必須チェックはユースケース層で行うため、すべて Option で受ける
/// （欠落を 422 ではなく 400 のバリデーションエラーとして返すため）。
#[derive(Debug, Deserialize)]
pub struct StartWorkRequest {
    pub user_email:           Option<String>,
    pub recommended_time_min: Option<i64>,
    pub shoe_type:            Option<String>,
    pub temperature:          Option<f64>,
    pub humidity:             Option<f64>,
    pub locker_id:            Option<String>,
}

/// start-work レスポンス
#[derive(Debug, Serialize)]
pub struct StartWorkResponse {
    pub log_id:      String,
    pub locker_id:   String,
    pub start_time:  String,
    pub finish_time: String,
    pub status:      SessionStatus,
}

impl StartWorkResponse {
    fn from_session(session: &LockerSession) -> Self {
        Self {
            log_id:      session.log_id().to_string(),
            locker_id:   session.locker_id().to_string(),
            start_time:  session.started_at().to_rfc3339(),
            finish_time: session.finishes_at().to_rfc3339(),
            status:      session.status(),
        }
    }
}

/// start-work ハンドラの状態
pub struct StartWorkState {
    pub usecase: StartWorkUseCase,
}

/// クリーニングサイクルを開始する
///
/// ## エンドポイント
/// POST /api/v1/start-work
///
/// ## 処理フロー
/// 1. リクエストをパース
/// 2. ユースケースを呼び出し（バリデーション・追記）
/// 3. 201 Created + 作成したセッションを返す
pub async fn start_work(
    State(state): State<Arc<StartWorkState>>,
    Json(req): Json<StartWorkRequest>,
) -> Result<Response, ApiError> {
    let input = StartWorkInput {
        user_email:           req.user_email,
        recommended_time_min: req.recommended_time_min,
        shoe_type:            req.shoe_type,
        temperature:          req.temperature,
        humidity:             req.humidity,
        locker_id:            req.locker_id,
    };

    let session = state.usecase.start_work(input).await?;

    let response = ApiResponse::new(StartWorkResponse::from_session(&session));

    Ok((StatusCode::CREATED, Json(response)).into_response())
}
