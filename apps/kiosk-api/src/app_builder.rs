//! # アプリケーション構築
//!
//! State の注入とルーター構築を担当する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。
//!
//! ## CORS
//!
//! キオスクのフロントエンドはブラウザから直接このサービスを呼ぶため、
//! 任意オリジンからの POST を許可する（`x-cron-secret` ヘッダーを含む）。

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderName, Method, header},
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handler::{
    PickupState,
    SendEmailState,
    StartWorkState,
    UpdateStatusState,
    health_check,
    pickup_shoes,
    send_email,
    start_work,
    update_status,
};

/// State の注入とルーター定義を行う
///
/// インフラ初期化済みの依存（各ハンドラの State）を受け取り、
/// ルーターを組み立てる。
pub fn build_app(
    start_work_state: Arc<StartWorkState>,
    update_status_state: Arc<UpdateStatusState>,
    pickup_state: Arc<PickupState>,
    send_email_state: Arc<SendEmailState>,
) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-cron-secret"),
        ]);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/start-work", post(start_work))
        .with_state(start_work_state)
        .route("/api/v1/update-status", post(update_status))
        .with_state(update_status_state)
        .route("/api/v1/pickup-shoes", post(pickup_shoes))
        .with_state(pickup_state)
        .route("/api/v1/send-email", post(send_email))
        .with_state(send_email_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
