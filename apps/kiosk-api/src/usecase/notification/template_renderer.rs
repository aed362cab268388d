//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンで通知メールを HTML/plaintext 両形式で生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **件名はキオスク利用者向けの英語文面**: キオスクの表示言語に合わせる

use shoelocker_domain::notification::{AlmostReadyNotice, EmailMessage, NotificationError};
use tera::{Context, Tera};

/// 仕上がり間近通知の件名
const ALMOST_READY_SUBJECT: &str = "Your shoes are almost ready 👟";

/// テンプレートレンダラー
///
/// tera テンプレートエンジンをラップし、[`AlmostReadyNotice`] から
/// [`EmailMessage`] を生成する。
pub struct TemplateRenderer {
    engine: Tera,
}

impl TemplateRenderer {
    /// 新しいレンダラーインスタンスを作成
    ///
    /// `include_str!` で埋め込んだテンプレートを tera に登録する。
    pub fn new() -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    "almost_ready.html",
                    include_str!("../../../templates/notifications/almost_ready.html"),
                ),
                (
                    "almost_ready.txt",
                    include_str!("../../../templates/notifications/almost_ready.txt"),
                ),
            ])
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine })
    }

    /// 通知イベントからメールメッセージを生成する
    pub fn render(&self, notice: &AlmostReadyNotice) -> Result<EmailMessage, NotificationError> {
        let mut context = Context::new();
        context.insert("percent", &notice.percent_complete.as_u8());

        let html_body = self
            .engine
            .render("almost_ready.html", &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        let text_body = self
            .engine
            .render("almost_ready.txt", &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(EmailMessage {
            to: notice.recipient.to_string(),
            subject: ALMOST_READY_SUBJECT.to_string(),
            html_body,
            text_body,
        })
    }
}
