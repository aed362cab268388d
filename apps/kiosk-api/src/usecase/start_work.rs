//! クリーニングサイクル開始ユースケース

use std::sync::Arc;

use chrono::FixedOffset;
use shoelocker_domain::{
    clock::Clock,
    session::{LockerSession, StartSession},
    value_objects::{Email, LockerId, RecommendedMinutes, ShoeType},
};
use shoelocker_infra::repository::SessionLogRepository;

use crate::error::ApiError;

/// セッション開始の入力
///
/// リクエストボディをそのまま写した形。必須チェックを含むバリデーションは
/// ユースケース内で値オブジェクトへの変換時に行う。
#[derive(Debug, Clone, Default)]
pub struct StartWorkInput {
    pub user_email:           Option<String>,
    pub recommended_time_min: Option<i64>,
    pub shoe_type:            Option<String>,
    pub temperature:          Option<f64>,
    pub humidity:             Option<f64>,
    pub locker_id:            Option<String>,
}

/// クリーニングサイクル開始ユースケース
pub struct StartWorkUseCase {
    repository:        Arc<dyn SessionLogRepository>,
    clock:             Arc<dyn Clock>,
    kiosk_offset:      FixedOffset,
    default_locker_id: LockerId,
}

impl StartWorkUseCase {
    pub fn new(
        repository: Arc<dyn SessionLogRepository>,
        clock: Arc<dyn Clock>,
        kiosk_offset: FixedOffset,
        default_locker_id: LockerId,
    ) -> Self {
        Self {
            repository,
            clock,
            kiosk_offset,
            default_locker_id,
        }
    }

    /// セッションを開始し、スプレッドシートに追記する
    ///
    /// # 処理フロー
    ///
    /// 1. 入力を値オブジェクトに変換（必須チェック・範囲チェック）
    /// 2. 現在時刻から開始・仕上がり時刻を算出
    /// 3. セッションを生成して追記
    pub async fn start_work(&self, input: StartWorkInput) -> Result<LockerSession, ApiError> {
        let user_email = Email::new(
            input
                .user_email
                .ok_or_else(|| ApiError::Validation("user_email は必須です".to_string()))?,
        )?;

        let recommended_minutes = RecommendedMinutes::try_from(
            input.recommended_time_min.ok_or_else(|| {
                ApiError::Validation("recommended_time_min は必須です".to_string())
            })?,
        )?;

        let shoe_type = input.shoe_type.map(ShoeType::new).transpose()?;

        let locker_id = input
            .locker_id
            .map(LockerId::new)
            .transpose()?
            .unwrap_or_else(|| self.default_locker_id.clone());

        let started_at = self.clock.now().with_timezone(&self.kiosk_offset);

        let session = LockerSession::start(
            StartSession {
                locker_id,
                user_email,
                shoe_type,
                recommended_minutes,
                temperature: input.temperature,
                humidity: input.humidity,
            },
            started_at,
        );

        self.repository.append(&session).await?;

        tracing::info!(
            log_id = %session.log_id(),
            locker_id = %session.locker_id(),
            finishes_at = %session.finishes_at(),
            "クリーニングサイクルを開始しました"
        );

        Ok(session)
    }
}
