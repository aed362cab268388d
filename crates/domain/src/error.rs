//! # ドメイン層エラー定義
//!
//! ビジネスルール違反やドメイン固有の例外状態を表現するエラー型。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 入力値の検証失敗 |
//! | `NotFound` | 404 Not Found | エンティティが存在しない |
//! | `InvalidTransition` | 409 Conflict | 許可されないステータス遷移 |
//! | `DeadlineNotElapsed` | （エラーではなく分岐） | 仕上がり時刻前の引き取り要求 |

use chrono::{DateTime, FixedOffset};
use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// ビジネスロジックの実行中に発生する例外状態を表現する。
/// API 層でこのエラーを受け取り、適切な HTTP レスポンスに変換する。
#[derive(Debug, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 入力値がビジネスルールに違反している場合に使用する。
    /// 必須フィールドの欠落、文字数超過、不正なフォーマットなど。
    #[error("バリデーションエラー: {0}")]
    Validation(String),

    /// エンティティが見つからない
    ///
    /// `entity_type` にはエンティティの種類（"LockerSession" など）を指定し、
    /// エラーメッセージを具体的にする。
    #[error("{entity_type} が見つかりません: {id}")]
    NotFound {
        /// エンティティの種類
        entity_type: &'static str,
        /// 検索に使用した識別子
        id:          String,
    },

    /// 許可されないステータス遷移
    ///
    /// セッションのライフサイクル（in_progress → ready_for_pickup →
    /// picked_up）に反する遷移を要求された場合に使用する。
    /// `picked_up` は終端状態であり、いかなる遷移も許可されない。
    #[error("不正なステータス遷移です: {from} → {to}")]
    InvalidTransition {
        /// 遷移元ステータス
        from: &'static str,
        /// 遷移先ステータス
        to:   &'static str,
    },

    /// 仕上がり時刻がまだ経過していない
    ///
    /// 引き取り操作が仕上がり時刻前に要求された場合に返す。
    /// 呼び出し側（ユースケース層）はこれをエラー応答ではなく
    /// 「処理中」の正常応答に変換する。
    #[error("仕上がり時刻（{finishes_at}）を過ぎていません")]
    DeadlineNotElapsed {
        /// セッションの仕上がり時刻
        finishes_at: DateTime<FixedOffset>,
    },
}
