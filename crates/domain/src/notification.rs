//! # 通知
//!
//! メール通知に関するドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **通知イベントとメール生成の分離**: [`AlmostReadyNotice`] は
//!   「何を知らせるか」だけを持ち、件名・本文の組み立て
//!   （TemplateRenderer）は kiosk-api 側の責務
//! - **送信手段の抽象化**: 実際の送信はインフラ層の
//!   `NotificationSender` トレイト実装が担当する

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DomainError, value_objects::Email};

/// 通知送信エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// メール送信に失敗
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),
}

/// メールメッセージ
///
/// テンプレートレンダリングの出力。`NotificationSender` に渡される。
#[derive(Debug, Clone)]
pub struct EmailMessage {
    /// 送信先メールアドレス
    pub to:        String,
    /// 件名
    pub subject:   String,
    /// HTML 本文
    pub html_body: String,
    /// プレーンテキスト本文
    pub text_body: String,
}

/// クリーニング進捗率（値オブジェクト）
///
/// 仕上がり間近通知に載せる進捗率。キオスク側が送ってこない場合は
/// 既定値 95% を使用する。
///
/// # 不変条件
///
/// - 1 以上 100 以下
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentComplete(u8);

impl PercentComplete {
    /// 指定した値から進捗率を作成する
    ///
    /// # エラー
    ///
    /// 0 または 100 超の場合は `DomainError::Validation` を返す。
    pub fn new(value: u8) -> Result<Self, DomainError> {
        if value == 0 || value > 100 {
            return Err(DomainError::Validation(
                "進捗率は 1 以上 100 以下である必要があります".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// 内部の u8 値を取得する
    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

impl Default for PercentComplete {
    /// 既定の進捗率（95%）
    fn default() -> Self {
        Self(95)
    }
}

impl std::fmt::Display for PercentComplete {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 仕上がり間近通知イベント
///
/// クリーニングの完了が近いことを利用者に知らせる。
/// send-email 操作から生成される唯一の通知イベント。
#[derive(Debug, Clone)]
pub struct AlmostReadyNotice {
    /// 通知の宛先（利用者のメールアドレス）
    pub recipient:        Email,
    /// クリーニング進捗率
    pub percent_complete: PercentComplete,
}
