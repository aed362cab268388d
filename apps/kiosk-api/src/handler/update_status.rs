//! ステータス巡回更新ハンドラ

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use shoelocker_shared::ApiResponse;
use subtle::ConstantTimeEq;

use crate::{error::ApiError, usecase::UpdateStatusUseCase};

/// cron シークレットを運ぶヘッダー名
const CRON_SECRET_HEADER: &str = "x-cron-secret";

/// update-status レスポンス
#[derive(Debug, Serialize)]
pub struct UpdateStatusResponse {
    /// `ready_for_pickup` に更新した行数
    pub updated_count: usize,
}

/// update-status ハンドラの状態
pub struct UpdateStatusState {
    pub usecase:     UpdateStatusUseCase,
    /// `x-cron-secret` ヘッダーと比較する共有シークレット
    pub cron_secret: String,
}

/// 共有シークレットを検証する
///
/// タイミング攻撃を避けるため、一致判定は定数時間比較で行う。
fn verify_cron_secret(headers: &HeaderMap, expected: &str) -> Result<(), ApiError> {
    let provided = headers
        .get(CRON_SECRET_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            ApiError::Unauthorized(format!("{CRON_SECRET_HEADER} ヘッダーがありません"))
        })?;

    if !bool::from(provided.as_bytes().ct_eq(expected.as_bytes())) {
        return Err(ApiError::Unauthorized(
            "cron シークレットが一致しません".to_string(),
        ));
    }

    Ok(())
}

/// 仕上がり時刻を過ぎたセッションのステータスを一括更新する
///
/// ## エンドポイント
/// POST /api/v1/update-status
///
/// cron からの定期呼び出しを想定し、`x-cron-secret` ヘッダーで保護する。
///
/// ## 処理フロー
/// 1. 共有シークレットを検証（不一致は 401）
/// 2. ユースケースを呼び出し
/// 3. 更新行数を返す
pub async fn update_status(
    State(state): State<Arc<UpdateStatusState>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    verify_cron_secret(&headers, &state.cron_secret)?;

    let updated_count = state.usecase.update_overdue().await?;

    let response = ApiResponse::new(UpdateStatusResponse { updated_count });

    Ok((StatusCode::OK, Json(response)).into_response())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers_with_secret(secret: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CRON_SECRET_HEADER, HeaderValue::from_str(secret).unwrap());
        headers
    }

    #[test]
    fn test_一致するシークレットは受理される() {
        let headers = headers_with_secret("s3cret");
        assert!(verify_cron_secret(&headers, "s3cret").is_ok());
    }

    #[test]
    fn test_不一致のシークレットは拒否される() {
        let headers = headers_with_secret("wrong");
        let err = verify_cron_secret(&headers, "s3cret").unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn test_長さの異なるシークレットも拒否される() {
        let headers = headers_with_secret("s3cret-and-more");
        assert!(verify_cron_secret(&headers, "s3cret").is_err());
    }

    #[test]
    fn test_ヘッダーがない場合は拒否される() {
        let headers = HeaderMap::new();
        let err = verify_cron_secret(&headers, "s3cret").unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }
}
