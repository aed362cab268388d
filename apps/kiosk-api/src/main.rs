//! # Kiosk API サーバー
//!
//! スマートシューロッカーのキオスクが呼び出す HTTP API。
//!
//! ## 役割
//!
//! - **start-work**: クリーニングサイクルの開始とセッションの記録
//! - **update-status**: 仕上がり済みセッションのステータス巡回更新（cron）
//! - **pickup-shoes**: 靴の引き取りの記録
//! - **send-email**: 仕上がり間近通知メールの送信
//!
//! データストアは Google スプレッドシート 1 枚（セッションログ）で、
//! すべてのハンドラはステートレス。プロセス内に共有状態を持たない。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `KIOSK_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `KIOSK_PORT` | **Yes** | ポート番号 |
//! | `SHEET_ID` | **Yes** | セッションログのスプレッドシート ID |
//! | `GOOGLE_SERVICE_ACCOUNT_BASE64` | **Yes** | サービスアカウント鍵 JSON（Base64） |
//! | `CRON_SECRET` | **Yes** | update-status を保護する共有シークレット |
//! | `DEFAULT_LOCKER_ID` | No | 既定のロッカー ID（デフォルト: `L001`） |
//! | `KIOSK_UTC_OFFSET_MINUTES` | No | キオスクのタイムゾーン（デフォルト: `420` = UTC+7） |
//! | `NOTIFICATION_BACKEND` | No | `resend` / `smtp` / `noop`（デフォルト: `noop`） |
//! | `RESEND_API_KEY` | backend=resend 時 | Resend の API キー |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境
//! cargo run -p shoelocker-kiosk-api
//!
//! # 本番環境
//! KIOSK_PORT=3000 SHEET_ID=... cargo run -p shoelocker-kiosk-api --release
//! ```

use std::{net::SocketAddr, sync::Arc};

use chrono::FixedOffset;
use shoelocker_domain::{
    clock::{Clock, SystemClock},
    value_objects::LockerId,
};
use shoelocker_infra::{
    notification::{
        NoopNotificationSender,
        NotificationSender,
        ResendNotificationSender,
        SmtpNotificationSender,
    },
    repository::{SessionLogRepository, SheetsSessionLogRepository},
    sheets::{GoogleSheetsClient, ServiceAccountKey, SheetsApi},
};
use shoelocker_kiosk_api::{
    app_builder::build_app,
    config::KioskConfig,
    handler::{PickupState, SendEmailState, StartWorkState, UpdateStatusState},
    usecase::{
        NotificationService,
        PickupUseCase,
        StartWorkUseCase,
        TemplateRenderer,
        UpdateStatusUseCase,
    },
};
use shoelocker_shared::observability::TracingConfig;
use tokio::net::TcpListener;

/// Kiosk API サーバーのエントリーポイント
///
/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. アプリケーション設定の読み込み
/// 4. 依存コンポーネントの初期化（Sheets クライアント・通知バックエンド）
/// 5. ルーターの構築と HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    // 本番環境では .env ファイルは使用せず、環境変数を直接設定する
    dotenvy::dotenv().ok();

    // トレーシング初期化
    let tracing_config = TracingConfig::from_env("kiosk-api");
    shoelocker_shared::observability::init_tracing(tracing_config);

    // 設定読み込み
    let config = KioskConfig::from_env().expect("設定の読み込みに失敗しました");

    tracing::info!(
        "Kiosk API サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // キオスクのタイムゾーン（固定オフセット。バンコクなら +07:00）
    let kiosk_offset = FixedOffset::east_opt(config.kiosk_utc_offset_minutes * 60)
        .expect("KIOSK_UTC_OFFSET_MINUTES が範囲外です");

    let default_locker_id =
        LockerId::new(config.default_locker_id.clone()).expect("DEFAULT_LOCKER_ID が不正です");

    // スプレッドシート接続
    let key = ServiceAccountKey::from_base64(&config.service_account_base64)
        .expect("サービスアカウント鍵の読み込みに失敗しました");
    let sheets: Arc<dyn SheetsApi> =
        Arc::new(GoogleSheetsClient::new(config.sheet_id.clone(), key));
    let repository: Arc<dyn SessionLogRepository> =
        Arc::new(SheetsSessionLogRepository::new(sheets));
    tracing::info!(sheet_id = %config.sheet_id, "スプレッドシートクライアントを初期化しました");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // 通知バックエンドの選択
    let sender: Arc<dyn NotificationSender> = match config.notification.backend.as_str() {
        "resend" => {
            let api_key = config
                .notification
                .resend_api_key
                .clone()
                .expect("RESEND_API_KEY が設定されていません（backend=resend には必須です）");
            Arc::new(ResendNotificationSender::new(
                api_key,
                config.notification.from_address.clone(),
            ))
        }
        "smtp" => Arc::new(SmtpNotificationSender::new(
            &config.notification.smtp_host,
            config.notification.smtp_port,
            config.notification.from_address.clone(),
        )),
        "noop" => Arc::new(NoopNotificationSender),
        other => {
            tracing::warn!("不明な NOTIFICATION_BACKEND={other}、noop を使用します");
            Arc::new(NoopNotificationSender)
        }
    };
    tracing::info!(backend = %config.notification.backend, "通知バックエンドを初期化しました");

    let template_renderer =
        TemplateRenderer::new().expect("通知テンプレートの読み込みに失敗しました");

    // 各ハンドラの State を組み立てる
    let start_work_state = Arc::new(StartWorkState {
        usecase: StartWorkUseCase::new(
            repository.clone(),
            clock.clone(),
            kiosk_offset,
            default_locker_id,
        ),
    });
    let update_status_state = Arc::new(UpdateStatusState {
        usecase:     UpdateStatusUseCase::new(repository.clone(), clock.clone(), kiosk_offset),
        cron_secret: config.cron_secret.clone(),
    });
    let pickup_state = Arc::new(PickupState {
        usecase: PickupUseCase::new(repository.clone(), clock.clone(), kiosk_offset),
    });
    let send_email_state = Arc::new(SendEmailState {
        service: NotificationService::new(sender, template_renderer),
    });

    // ルーター構築
    let app = build_app(
        start_work_state,
        update_status_state,
        pickup_state,
        send_email_state,
    );

    // サーバー起動
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("アドレスのパースに失敗しました");

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Kiosk API サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
