//! # Kiosk API エラー定義
//!
//! Kiosk API 固有のエラーと、HTTP レスポンス（RFC 9457 Problem Details）への
//! 変換を定義する。
//!
//! 上流サービス（スプレッドシート API・メール API）のエラーは
//! ログに詳細を残したうえで、クライアントには固定メッセージの 500 を返す。

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use shoelocker_domain::{DomainError, notification::NotificationError};
use shoelocker_infra::InfraError;
use shoelocker_shared::ErrorResponse;
use thiserror::Error;

/// Kiosk API で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
    /// 入力値の検証失敗
    #[error("バリデーションエラー: {0}")]
    Validation(String),

    /// 認証失敗（cron シークレット不一致など）
    #[error("認証エラー: {0}")]
    Unauthorized(String),

    /// リソースが見つからない
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// 競合（許可されないステータス遷移など）
    #[error("競合が発生しました: {0}")]
    Conflict(String),

    /// インフラエラー（スプレッドシート API など）
    #[error("インフラエラー: {0}")]
    Infra(#[from] InfraError),

    /// 通知エラー（メール送信失敗など）
    #[error("通知エラー: {0}")]
    Notification(#[from] NotificationError),

    /// 内部エラー
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::Validation(msg),
            DomainError::NotFound { .. } => Self::NotFound(err.to_string()),
            DomainError::InvalidTransition { .. } | DomainError::DeadlineNotElapsed { .. } => {
                Self::Conflict(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_response = match &self {
            ApiError::Validation(msg) => ErrorResponse::validation_error(msg.clone()),
            ApiError::Unauthorized(msg) => ErrorResponse::unauthorized(msg.clone()),
            ApiError::NotFound(msg) => ErrorResponse::not_found(msg.clone()),
            ApiError::Conflict(msg) => ErrorResponse::conflict(msg.clone()),
            ApiError::Infra(e) => {
                tracing::error!(error = %e, span_trace = %e.span_trace(), "上流 API エラー");
                ErrorResponse::internal_error()
            }
            ApiError::Notification(e) => {
                tracing::error!(error = %e, "通知送信エラー");
                ErrorResponse::internal_error()
            }
            ApiError::Internal(msg) => {
                tracing::error!("内部エラー: {}", msg);
                ErrorResponse::internal_error()
            }
        };

        let status = axum::http::StatusCode::from_u16(error_response.status)
            .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[rstest::rstest]
    #[case(ApiError::Validation("bad".into()), StatusCode::BAD_REQUEST)]
    #[case(ApiError::Unauthorized("no".into()), StatusCode::UNAUTHORIZED)]
    #[case(ApiError::NotFound("none".into()), StatusCode::NOT_FOUND)]
    #[case(ApiError::Conflict("dup".into()), StatusCode::CONFLICT)]
    #[case(ApiError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_エラー種別ごとのステータスコード(
        #[case] error: ApiError,
        #[case] expected: StatusCode,
    ) {
        let response = error.into_response();
        assert_eq!(response.status(), expected);
    }

    #[test]
    fn test_ドメインの遷移エラーはconflictになる() {
        let err: ApiError = DomainError::InvalidTransition {
            from: "picked_up",
            to:   "ready_for_pickup",
        }
        .into();

        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn test_ドメインのバリデーションエラーはvalidationになる() {
        let err: ApiError = DomainError::Validation("メールアドレスは必須です".into()).into();

        assert!(matches!(err, ApiError::Validation(_)));
    }
}
