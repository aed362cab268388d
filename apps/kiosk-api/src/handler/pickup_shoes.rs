//! 引き取り記録ハンドラ

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use shoelocker_domain::session::SessionStatus;
use shoelocker_shared::ApiResponse;

use crate::{
    error::ApiError,
    usecase::{PickupOutcome, PickupUseCase},
};

/// pickup-shoes リクエスト
#[derive(Debug, Deserialize)]
pub struct PickupShoesRequest {
    pub user_email: Option<String>,
}

/// pickup-shoes レスポンス
///
/// 仕上がり済みかどうかで形が変わるため、`outcome` タグ付きの列挙で返す。
/// どちらの場合も HTTP 200（「まだ仕上がっていない」はエラーではない）。
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PickupShoesResponse {
    /// 引き取りを記録した
    PickedUp {
        pickup_time: String,
        status:      SessionStatus,
    },
    /// まだ仕上がり時刻前
    NotReady {
        finish_time: String,
        status:      SessionStatus,
    },
}

/// pickup-shoes ハンドラの状態
pub struct PickupState {
    pub usecase: PickupUseCase,
}

/// 利用者の靴の引き取りを記録する
///
/// ## エンドポイント
/// POST /api/v1/pickup-shoes
///
/// ## 処理フロー
/// 1. リクエストをパース
/// 2. ユースケースを呼び出し（最新のアクティブな行の探索・仕上がり判定）
/// 3. 結果に応じたレスポンスを返す（アクティブな行がなければ 404）
pub async fn pickup_shoes(
    State(state): State<Arc<PickupState>>,
    Json(req): Json<PickupShoesRequest>,
) -> Result<Response, ApiError> {
    let outcome = state.usecase.pickup(req.user_email).await?;

    let response = match outcome {
        PickupOutcome::PickedUp { session } => {
            let pickup_time = session
                .picked_up_at()
                .map(|t| t.to_rfc3339())
                .unwrap_or_default();

            PickupShoesResponse::PickedUp {
                pickup_time,
                status: session.status(),
            }
        }
        PickupOutcome::NotReady {
            finishes_at,
            status,
        } => PickupShoesResponse::NotReady {
            finish_time: finishes_at.to_rfc3339(),
            status,
        },
    };

    Ok((StatusCode::OK, Json(ApiResponse::new(response))).into_response())
}
