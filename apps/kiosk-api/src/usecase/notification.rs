//! # 通知サービス
//!
//! テンプレートレンダリング → メール送信を統合するサービス。
//!
//! send-email 操作はメール送信そのものが目的のため、
//! 送信失敗はエラーとして呼び出し元に返す（fire-and-forget にしない）。

mod template_renderer;

use std::sync::Arc;

use shoelocker_domain::{
    notification::{AlmostReadyNotice, PercentComplete},
    value_objects::Email,
};
use shoelocker_infra::notification::NotificationSender;
pub use template_renderer::TemplateRenderer;

use crate::error::ApiError;

/// 通知サービス
///
/// 仕上がり間近通知のレンダリングと送信を担当する。
/// `NotificationSender` は trait で抽象化され、環境変数で実装を切り替える。
pub struct NotificationService {
    sender:            Arc<dyn NotificationSender>,
    template_renderer: TemplateRenderer,
}

impl NotificationService {
    pub fn new(sender: Arc<dyn NotificationSender>, template_renderer: TemplateRenderer) -> Self {
        Self {
            sender,
            template_renderer,
        }
    }

    /// 仕上がり間近通知を送信する
    ///
    /// # 引数
    ///
    /// - `recipient`: 宛先メールアドレス（必須）
    /// - `percent`: 進捗率（省略時は 95）
    pub async fn send_almost_ready(
        &self,
        recipient: Option<String>,
        percent: Option<i64>,
    ) -> Result<AlmostReadyNotice, ApiError> {
        let recipient = Email::new(
            recipient.ok_or_else(|| ApiError::Validation("user_email は必須です".to_string()))?,
        )?;

        let percent_complete = match percent {
            Some(value) => {
                let value = u8::try_from(value).map_err(|_| {
                    ApiError::Validation(
                        "進捗率は 1 以上 100 以下である必要があります".to_string(),
                    )
                })?;
                PercentComplete::new(value)?
            }
            None => PercentComplete::default(),
        };

        let notice = AlmostReadyNotice {
            recipient,
            percent_complete,
        };

        let email = self.template_renderer.render(&notice)?;
        self.sender.send_email(&email).await?;

        tracing::info!(
            to = %notice.recipient,
            percent = notice.percent_complete.as_u8(),
            "仕上がり間近通知を送信しました"
        );

        Ok(notice)
    }
}
