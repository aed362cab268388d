//! Resend 通知送信実装
//!
//! Resend の REST API（`POST /emails`）でメールを送信する。
//! 本番環境で使用するバックエンド。

use async_trait::async_trait;
use serde::Serialize;
use shoelocker_domain::notification::{EmailMessage, NotificationError};

use super::NotificationSender;

/// Resend API のエンドポイント
const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// `POST /emails` のリクエストボディ
#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from:    &'a str,
    to:      [&'a str; 1],
    subject: &'a str,
    html:    &'a str,
    text:    &'a str,
}

/// Resend 通知送信
///
/// API キーによる Bearer 認証で Resend にメール送信を依頼する。
pub struct ResendNotificationSender {
    http:         reqwest::Client,
    api_key:      String,
    from_address: String,
}

impl ResendNotificationSender {
    /// 新しい Resend 送信インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `api_key`: Resend の API キー
    /// - `from_address`: 送信元メールアドレス
    pub fn new(api_key: String, from_address: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            from_address,
        }
    }
}

#[async_trait]
impl NotificationSender for ResendNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let request = SendEmailRequest {
            from:    &self.from_address,
            to:      [&email.to],
            subject: &email.subject,
            html:    &email.html_body,
            text:    &email.text_body,
        };

        let response = self
            .http
            .post(RESEND_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(format!("Resend への接続に失敗: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::SendFailed(format!(
                "Resend がエラーを返しました（status={}）: {body}",
                status.as_u16()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_リクエストボディのシリアライズ形状() {
        let request = SendEmailRequest {
            from:    "noreply@shoelocker.example.com",
            to:      ["user@example.com"],
            subject: "Your shoes are almost ready 👟",
            html:    "<p>95%</p>",
            text:    "95%",
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "from": "noreply@shoelocker.example.com",
                "to": ["user@example.com"],
                "subject": "Your shoes are almost ready 👟",
                "html": "<p>95%</p>",
                "text": "95%",
            })
        );
    }

    #[test]
    fn トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ResendNotificationSender>();
    }
}
