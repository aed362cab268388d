//! # Kiosk API 設定
//!
//! 環境変数から Kiosk API サーバーの設定を読み込む。

use std::env;

/// Kiosk API サーバーの設定
#[derive(Debug, Clone)]
pub struct KioskConfig {
    /// バインドアドレス
    pub host: String,
    /// ポート番号
    pub port: u16,
    /// セッションログを保持するスプレッドシートの ID
    pub sheet_id: String,
    /// サービスアカウント鍵 JSON（Base64 エンコード）
    pub service_account_base64: String,
    /// update-status の呼び出しを保護する共有シークレット
    pub cron_secret: String,
    /// locker_id 未指定時に使うロッカー ID
    pub default_locker_id: String,
    /// キオスクのタイムゾーン（UTC からのオフセット、分）
    pub kiosk_utc_offset_minutes: i32,
    /// 通知設定
    pub notification: NotificationConfig,
}

/// 通知機能の設定
///
/// `NOTIFICATION_BACKEND` 環境変数で送信バックエンドを切り替える:
/// - `resend`: Resend API 経由で送信（本番）
/// - `smtp`: Mailpit（開発）/ SMTP サーバー経由で送信
/// - `noop`: 送信しない（ログ出力のみ）
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// 送信バックエンド（"resend" | "smtp" | "noop"）
    pub backend:        String,
    /// Resend API キー（backend=resend の場合に必須）
    pub resend_api_key: Option<String>,
    /// SMTP ホスト（backend=smtp の場合に使用）
    pub smtp_host:      String,
    /// SMTP ポート（backend=smtp の場合に使用）
    pub smtp_port:      u16,
    /// 送信元メールアドレス
    pub from_address:   String,
}

impl KioskConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            host: env::var("KIOSK_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("KIOSK_PORT")
                .expect("KIOSK_PORT が設定されていません")
                .parse()
                .expect("KIOSK_PORT は有効なポート番号である必要があります"),
            sheet_id: env::var("SHEET_ID").expect("SHEET_ID が設定されていません"),
            service_account_base64: env::var("GOOGLE_SERVICE_ACCOUNT_BASE64")
                .expect("GOOGLE_SERVICE_ACCOUNT_BASE64 が設定されていません"),
            cron_secret: env::var("CRON_SECRET").expect("CRON_SECRET が設定されていません"),
            default_locker_id: env::var("DEFAULT_LOCKER_ID")
                .unwrap_or_else(|_| "L001".to_string()),
            kiosk_utc_offset_minutes: env::var("KIOSK_UTC_OFFSET_MINUTES")
                // 既定はバンコク（UTC+7）
                .unwrap_or_else(|_| "420".to_string())
                .parse()
                .expect("KIOSK_UTC_OFFSET_MINUTES は分単位の整数である必要があります"),
            notification: NotificationConfig::from_env(),
        })
    }
}

impl NotificationConfig {
    /// 環境変数から通知設定を読み込む
    fn from_env() -> Self {
        Self {
            backend:        env::var("NOTIFICATION_BACKEND").unwrap_or_else(|_| "noop".to_string()),
            resend_api_key: env::var("RESEND_API_KEY").ok(),
            smtp_host:      env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),
            smtp_port:      env::var("SMTP_PORT")
                .unwrap_or_else(|_| "1025".to_string())
                .parse()
                .expect("SMTP_PORT は有効なポート番号である必要があります"),
            from_address:   env::var("NOTIFICATION_FROM_ADDRESS")
                .unwrap_or_else(|_| "noreply@shoelocker.example.com".to_string()),
        }
    }
}
