//! 引き取り記録ユースケース

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use shoelocker_domain::{
    DomainError,
    clock::Clock,
    session::{LockerSession, SessionStatus},
    value_objects::Email,
};
use shoelocker_infra::repository::SessionLogRepository;

use crate::error::ApiError;

/// 引き取り操作の結果
#[derive(Debug, Clone)]
pub enum PickupOutcome {
    /// 引き取りを記録した
    PickedUp {
        /// 更新後のセッション（pickup_time が設定済み）
        session: LockerSession,
    },
    /// まだ仕上がり時刻前（シート上の状態は変更しない）
    NotReady {
        /// 仕上がり予定時刻
        finishes_at: DateTime<FixedOffset>,
        /// 現在のステータス
        status:      SessionStatus,
    },
}

/// 引き取り記録ユースケース
pub struct PickupUseCase {
    repository:   Arc<dyn SessionLogRepository>,
    clock:        Arc<dyn Clock>,
    kiosk_offset: FixedOffset,
}

impl PickupUseCase {
    pub fn new(
        repository: Arc<dyn SessionLogRepository>,
        clock: Arc<dyn Clock>,
        kiosk_offset: FixedOffset,
    ) -> Self {
        Self {
            repository,
            clock,
            kiosk_offset,
        }
    }

    /// 利用者の最新のアクティブなセッションに引き取りを記録する
    ///
    /// # 処理フロー
    ///
    /// 1. メールアドレスを検証し、最新のアクティブな行を線形走査で探す
    /// 2. 見つからなければ 404
    /// 3. 仕上がり時刻前なら [`PickupOutcome::NotReady`]（シートは変更しない）
    /// 4. 仕上がり済みなら引き取り時刻を記録し、該当行の
    ///    pickup_time / status を書き換える
    pub async fn pickup(&self, user_email: Option<String>) -> Result<PickupOutcome, ApiError> {
        let email = Email::new(
            user_email.ok_or_else(|| ApiError::Validation("user_email は必須です".to_string()))?,
        )?;

        let Some(mut stored) = self.repository.find_latest_active_by_email(&email).await? else {
            return Err(ApiError::NotFound(
                "この利用者のアクティブなクリーニングタスクが見つかりません".to_string(),
            ));
        };

        let now = self.clock.now().with_timezone(&self.kiosk_offset);

        match stored.session.record_pickup(now) {
            Ok(()) => {
                self.repository.record_pickup(&stored).await?;

                tracing::info!(
                    log_id = %stored.session.log_id(),
                    row = stored.row_number,
                    "引き取りを記録しました"
                );

                Ok(PickupOutcome::PickedUp {
                    session: stored.session,
                })
            }
            Err(DomainError::DeadlineNotElapsed { finishes_at }) => Ok(PickupOutcome::NotReady {
                finishes_at,
                status: stored.session.status(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}
