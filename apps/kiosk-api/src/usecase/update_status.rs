//! ステータス巡回更新ユースケース

use std::sync::Arc;

use chrono::FixedOffset;
use shoelocker_domain::{DomainError, clock::Clock, session::SessionStatus};
use shoelocker_infra::repository::SessionLogRepository;

use crate::error::ApiError;

/// ステータス巡回更新ユースケース
///
/// cron から定期的に呼び出され、仕上がり時刻を過ぎた実行中セッションを
/// `ready_for_pickup` に進める。
pub struct UpdateStatusUseCase {
    repository:   Arc<dyn SessionLogRepository>,
    clock:        Arc<dyn Clock>,
    kiosk_offset: FixedOffset,
}

impl UpdateStatusUseCase {
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

    /// 仕上がり時刻を過ぎた実行中セッションを一括で `ready_for_pickup` にする
    ///
    /// # 処理フロー
    ///
    /// 1. 全行を読み取る（形式不正の行はリポジトリがスキップ済み）
    /// 2. `in_progress` 以外（引き取り待ち・引き取り済み）は対象外
    /// 3. 遷移可否はエンティティの `mark_ready` に委譲し、
    ///    仕上がり前のものはそのまま残す
    /// 4. 対象行のステータスを 1 回の batchUpdate で書き換える
    ///
    /// # 戻り値
    ///
    /// 更新した行数。すべて最新なら 0。
    pub async fn update_overdue(&self) -> Result<usize, ApiError> {
        let now = self.clock.now().with_timezone(&self.kiosk_offset);
        let sessions = self.repository.list_all().await?;

        let mut overdue_rows = Vec::new();
        for mut stored in sessions {
            if stored.session.status() != SessionStatus::InProgress {
                continue;
            }

            match stored.session.mark_ready(now) {
                Ok(()) => overdue_rows.push(stored.row_number),
                // まだ仕上がっていない行はそのまま
                Err(DomainError::DeadlineNotElapsed { .. }) => {}
                Err(e) => return Err(e.into()),
            }
        }

        self.repository.mark_ready(&overdue_rows).await?;

        if overdue_rows.is_empty() {
            tracing::info!("更新対象のセッションはありません");
        } else {
            tracing::info!(
                updated_count = overdue_rows.len(),
                "仕上がり済みセッションを ready_for_pickup に更新しました"
            );
        }

        Ok(overdue_rows.len())
    }
}
