//! # インフラ層エラー定義
//!
//! スプレッドシート API や認証基盤との通信で発生するエラーを表現する。
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターンを採用:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別（Http, Api, Auth 等）
//!
//! `From` 実装や convenience constructor でエラーを生成すると、
//! その時点のスパン情報（呼び出し経路）が自動的にキャプチャされる。

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// エラー種別（[`InfraErrorKind`]）と [`SpanTrace`]（呼び出し経路）を保持する。
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
///
/// スプレッドシート API 呼び出し、トークン取得などで発生するエラーの
/// 具体的な種別。API 層でこのエラー種別に応じて適切な HTTP レスポンスに
/// 変換する（基本的にはすべて 500 として上流エラーを伝搬する）。
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// HTTP 通信エラー
    ///
    /// 接続失敗、タイムアウト、TLS エラーなど。
    #[error("HTTP 通信エラー: {0}")]
    Http(#[source] reqwest::Error),

    /// 上流 API のエラー応答
    ///
    /// Sheets API などが非 2xx を返した場合。ステータスとボディを保持し、
    /// ログから上流の失敗理由を追跡できるようにする。
    #[error("上流 API エラー（status={status}）: {body}")]
    Api {
        /// 上流のステータスコード
        status: u16,
        /// 上流のレスポンスボディ
        body:   String,
    },

    /// 認証エラー
    ///
    /// サービスアカウント鍵の読み込み失敗、JWT 署名失敗、
    /// トークン交換の失敗など。
    #[error("認証エラー: {0}")]
    Auth(String),

    /// シリアライズ/デシリアライズエラー
    #[error("シリアライズエラー: {0}")]
    Serialization(#[source] serde_json::Error),

    /// スプレッドシート行の形式不正
    ///
    /// 必須セルの欠落、タイムスタンプやステータスのパース失敗など。
    /// 呼び出し側（リポジトリ）は該当行をスキップして処理を継続する。
    #[error("行 {row} の形式が不正です: {detail}")]
    InvalidRow {
        /// スプレッドシート上の行番号（1 始まり）
        row:    u32,
        /// 不正の内容
        detail: String,
    },

    /// 予期しないエラー
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

// ===== InfraError のメソッド =====

impl InfraError {
    /// エラー種別を取得する
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    /// SpanTrace を取得する
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    // ===== Convenience constructors =====

    /// 上流 API のエラー応答からエラーを生成する
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::Api {
                status,
                body: body.into(),
            },
            span_trace: SpanTrace::capture(),
        }
    }

    /// 認証エラーを生成する
    pub fn auth(msg: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::Auth(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }

    /// 行形式不正エラーを生成する
    pub fn invalid_row(row: u32, detail: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::InvalidRow {
                row,
                detail: detail.into(),
            },
            span_trace: SpanTrace::capture(),
        }
    }

    /// 予期しないエラーを生成する
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::Unexpected(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }
}

// ===== トレイト実装 =====

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

// ===== From 実装（SpanTrace 自動キャプチャ） =====

impl From<reqwest::Error> for InfraError {
    fn from(source: reqwest::Error) -> Self {
        Self {
            kind:       InfraErrorKind::Http(source),
            span_trace: SpanTrace::capture(),
        }
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(source: serde_json::Error) -> Self {
        Self {
            kind:       InfraErrorKind::Serialization(source),
            span_trace: SpanTrace::capture(),
        }
    }
}
