//! 仕上がり間近通知ハンドラ

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use shoelocker_shared::ApiResponse;

use crate::{error::ApiError, usecase::NotificationService};

/// send-email リクエスト
#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    pub user_email: Option<String>,
    /// クリーニング進捗率（省略時は 95）
    pub percent:    Option<i64>,
}

/// send-email レスポンス
#[derive(Debug, Serialize)]
pub struct SendEmailResponse {
    /// 送信先メールアドレス
    pub recipient: String,
    /// 通知に載せた進捗率
    pub percent:   u8,
}

/// send-email ハンドラの状態
pub struct SendEmailState {
    pub service: NotificationService,
}

/// 仕上がり間近通知メールを送信する
///
/// ## エンドポイント
/// POST /api/v1/send-email
///
/// ## 処理フロー
/// 1. リクエストをパース
/// 2. 通知サービスを呼び出し（レンダリング・送信）
/// 3. 送信内容のサマリを返す（送信失敗は 500）
pub async fn send_email(
    State(state): State<Arc<SendEmailState>>,
    Json(req): Json<SendEmailRequest>,
) -> Result<Response, ApiError> {
    let notice = state
        .service
        .send_almost_ready(req.user_email, req.percent)
        .await?;

    let response = ApiResponse::new(SendEmailResponse {
        recipient: notice.recipient.to_string(),
        percent:   notice.percent_complete.as_u8(),
    });

    Ok((StatusCode::OK, Json(response)).into_response())
}
