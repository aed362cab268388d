//! セッションログリポジトリ
//!
//! スプレッドシートの 1 枚のシートをセッションログとして読み書きする。
//!
//! ## シートの構成
//!
//! 列は A〜K の固定 11 列。1 行目はヘッダー（シートのプロビジョニング時に
//! 設定される）で、データは 2 行目から始まる。
//!
//! | 列 | 内容 |
//! |----|------|
//! | A | log_id |
//! | B | locker_id |
//! | C | user_email |
//! | D | shoe_type |
//! | E | recommended_minutes |
//! | F | temperature |
//! | G | humidity |
//! | H | start_time |
//! | I | finish_time |
//! | J | pickup_time |
//! | K | status |
//!
//! タイムスタンプは RFC 3339（キオスクのタイムゾーンのオフセット付き）で
//! 格納する。形式不正の行は読み取り時に警告ログを出してスキップする。

use std::{str::FromStr, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use shoelocker_domain::{
    session::{LockerSession, LogId, SessionStatus},
    value_objects::{Email, LockerId, RecommendedMinutes, ShoeType},
};

use crate::{
    InfraError,
    sheets::{SheetsApi, ValueRange},
};

/// 列インデックス（0 始まり）
mod column {
    pub const LOG_ID: usize = 0;
    pub const LOCKER_ID: usize = 1;
    pub const USER_EMAIL: usize = 2;
    pub const SHOE_TYPE: usize = 3;
    pub const RECOMMENDED_MINUTES: usize = 4;
    pub const TEMPERATURE: usize = 5;
    pub const HUMIDITY: usize = 6;
    pub const START_TIME: usize = 7;
    pub const FINISH_TIME: usize = 8;
    pub const PICKUP_TIME: usize = 9;
    pub const STATUS: usize = 10;
}

/// 読み書き対象の範囲（全 11 列）
const SHEET_RANGE: &str = "A:K";

/// ヘッダー行の行番号（1 始まり）
const HEADER_ROW: u32 = 1;

/// pickup_time 列の列記号（部分更新用）
const PICKUP_TIME_COLUMN: &str = "J";

/// status 列の列記号（部分更新用）
const STATUS_COLUMN: &str = "K";

/// 行番号付きセッション
///
/// 読み取ったセッションがシートのどの行にあるかを保持し、
/// 部分更新（status / pickup_time の書き込み）で行を特定できるようにする。
#[derive(Debug, Clone)]
pub struct StoredSession {
    /// シート上の行番号（1 始まり。データは 2 行目から）
    pub row_number: u32,
    /// 復元されたセッション
    pub session:    LockerSession,
}

/// セッションログリポジトリ
///
/// ユースケース層が依存するインターフェース。テスト時はスタブに差し替える。
#[async_trait]
pub trait SessionLogRepository: Send + Sync {
    /// セッションを末尾に追記する
    async fn append(&self, session: &LockerSession) -> Result<(), InfraError>;

    /// 全セッションを読み取る（形式不正の行はスキップ）
    async fn list_all(&self) -> Result<Vec<StoredSession>, InfraError>;

    /// 指定メールアドレスの最新のアクティブなセッションを探す
    ///
    /// 行順（= 追記順）で最後にマッチしたものを返す。
    async fn find_latest_active_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<StoredSession>, InfraError>;

    /// 指定行のステータスを `ready_for_pickup` に一括更新する
    async fn mark_ready(&self, row_numbers: &[u32]) -> Result<(), InfraError>;

    /// 引き取り済みセッションの pickup_time と status を書き込む
    async fn record_pickup(&self, stored: &StoredSession) -> Result<(), InfraError>;
}

/// スプレッドシートをストアとするリポジトリ実装
pub struct SheetsSessionLogRepository {
    sheets: Arc<dyn SheetsApi>,
}

impl SheetsSessionLogRepository {
    /// 新しいリポジトリを作成する
    pub fn new(sheets: Arc<dyn SheetsApi>) -> Self {
        Self { sheets }
    }
}

/// セッションをシートの 1 行（11 セル）に変換する
fn to_row(session: &LockerSession) -> Vec<String> {
    vec![
        session.log_id().to_string(),
        session.locker_id().to_string(),
        session.user_email().to_string(),
        session
            .shoe_type()
            .map(|s| s.to_string())
            .unwrap_or_default(),
        session.recommended_minutes().to_string(),
        session
            .temperature()
            .map(|v| v.to_string())
            .unwrap_or_default(),
        session.humidity().map(|v| v.to_string()).unwrap_or_default(),
        session.started_at().to_rfc3339(),
        session.finishes_at().to_rfc3339(),
        session
            .picked_up_at()
            .map(|t| t.to_rfc3339())
            .unwrap_or_default(),
        session.status().to_string(),
    ]
}

/// セルを取り出す（空白のみのセルと範囲外は None）
fn cell(cells: &[String], index: usize) -> Option<&str> {
    cells
        .get(index)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

/// 必須セルを取り出す
fn required_cell<'a>(
    cells: &'a [String],
    index: usize,
    name: &str,
    row_number: u32,
) -> Result<&'a str, InfraError> {
    cell(cells, index).ok_or_else(|| InfraError::invalid_row(row_number, format!("{name} が欠落")))
}

/// RFC 3339 タイムスタンプをパースする
fn parse_timestamp(
    value: &str,
    name: &str,
    row_number: u32,
) -> Result<DateTime<FixedOffset>, InfraError> {
    DateTime::parse_from_rfc3339(value)
        .map_err(|e| InfraError::invalid_row(row_number, format!("{name} のパースに失敗: {e}")))
}

/// シートの 1 行からセッションを復元する
fn parse_row(row_number: u32, cells: &[String]) -> Result<LockerSession, InfraError> {
    let invalid = |detail: String| InfraError::invalid_row(row_number, detail);

    let log_id = LogId::from_str(required_cell(cells, column::LOG_ID, "log_id", row_number)?)
        .map_err(|e| invalid(e.to_string()))?;

    let locker_id = LockerId::new(required_cell(
        cells,
        column::LOCKER_ID,
        "locker_id",
        row_number,
    )?)
    .map_err(|e| invalid(e.to_string()))?;

    let user_email = Email::new(required_cell(
        cells,
        column::USER_EMAIL,
        "user_email",
        row_number,
    )?)
    .map_err(|e| invalid(e.to_string()))?;

    let shoe_type = cell(cells, column::SHOE_TYPE)
        .map(ShoeType::new)
        .transpose()
        .map_err(|e| invalid(e.to_string()))?;

    let recommended_minutes = required_cell(
        cells,
        column::RECOMMENDED_MINUTES,
        "recommended_minutes",
        row_number,
    )?
    .parse::<u32>()
    .map_err(|e| invalid(format!("recommended_minutes のパースに失敗: {e}")))
    .and_then(|v| RecommendedMinutes::new(v).map_err(|e| invalid(e.to_string())))?;

    let temperature = cell(cells, column::TEMPERATURE)
        .map(|s| s.parse::<f64>())
        .transpose()
        .map_err(|e| invalid(format!("temperature のパースに失敗: {e}")))?;

    let humidity = cell(cells, column::HUMIDITY)
        .map(|s| s.parse::<f64>())
        .transpose()
        .map_err(|e| invalid(format!("humidity のパースに失敗: {e}")))?;

    let started_at = parse_timestamp(
        required_cell(cells, column::START_TIME, "start_time", row_number)?,
        "start_time",
        row_number,
    )?;

    let finishes_at = parse_timestamp(
        required_cell(cells, column::FINISH_TIME, "finish_time", row_number)?,
        "finish_time",
        row_number,
    )?;

    let picked_up_at = cell(cells, column::PICKUP_TIME)
        .map(|s| parse_timestamp(s, "pickup_time", row_number))
        .transpose()?;

    let status = SessionStatus::from_str(required_cell(
        cells,
        column::STATUS,
        "status",
        row_number,
    )?)
    .map_err(|e| invalid(e.to_string()))?;

    Ok(LockerSession::from_sheet(
        log_id,
        locker_id,
        user_email,
        shoe_type,
        recommended_minutes,
        temperature,
        humidity,
        started_at,
        finishes_at,
        picked_up_at,
        status,
    ))
}

#[async_trait]
impl SessionLogRepository for SheetsSessionLogRepository {
    async fn append(&self, session: &LockerSession) -> Result<(), InfraError> {
        self.sheets
            .append_values(SHEET_RANGE, vec![to_row(session)])
            .await
    }

    async fn list_all(&self) -> Result<Vec<StoredSession>, InfraError> {
        let rows = self.sheets.get_values(SHEET_RANGE).await?;

        let mut sessions = Vec::new();
        for (index, cells) in rows.iter().enumerate() {
            let row_number = index as u32 + 1;
            if row_number == HEADER_ROW {
                continue;
            }

            match parse_row(row_number, cells) {
                Ok(session) => sessions.push(StoredSession {
                    row_number,
                    session,
                }),
                Err(e) => {
                    tracing::warn!(row = row_number, error = %e, "形式不正の行をスキップします");
                }
            }
        }

        Ok(sessions)
    }

    async fn find_latest_active_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<StoredSession>, InfraError> {
        let sessions = self.list_all().await?;

        Ok(sessions
            .into_iter()
            .rev()
            .find(|stored| stored.session.user_email() == email && stored.session.is_active()))
    }

    async fn mark_ready(&self, row_numbers: &[u32]) -> Result<(), InfraError> {
        if row_numbers.is_empty() {
            return Ok(());
        }

        let status: &str = SessionStatus::ReadyForPickup.into();
        let data = row_numbers
            .iter()
            .map(|row| ValueRange {
                range:  format!("{STATUS_COLUMN}{row}"),
                values: vec![vec![status.to_string()]],
            })
            .collect();

        self.sheets.batch_update_values(data).await
    }

    async fn record_pickup(&self, stored: &StoredSession) -> Result<(), InfraError> {
        let picked_up_at = stored.session.picked_up_at().ok_or_else(|| {
            InfraError::unexpected("pickup_time が未設定のセッションで record_pickup が呼ばれました")
        })?;

        let row = stored.row_number;
        let status: &str = stored.session.status().into();

        self.sheets
            .update_values(
                &format!("{PICKUP_TIME_COLUMN}{row}:{STATUS_COLUMN}{row}"),
                vec![vec![picked_up_at.to_rfc3339(), status.to_string()]],
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;
    use shoelocker_domain::session::StartSession;

    use super::*;

    /// スタブ Sheets API（呼び出しを記録し、固定の値を返す）
    #[derive(Default)]
    struct StubSheetsApi {
        rows:    Vec<Vec<String>>,
        appends: Mutex<Vec<(String, Vec<Vec<String>>)>>,
        updates: Mutex<Vec<(String, Vec<Vec<String>>)>>,
        batches: Mutex<Vec<Vec<ValueRange>>>,
    }

    impl StubSheetsApi {
        fn with_rows(rows: Vec<Vec<String>>) -> Self {
            Self {
                rows,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl SheetsApi for StubSheetsApi {
        async fn get_values(&self, _range: &str) -> Result<Vec<Vec<String>>, InfraError> {
            Ok(self.rows.clone())
        }

        async fn append_values(
            &self,
            range: &str,
            rows: Vec<Vec<String>>,
        ) -> Result<(), InfraError> {
            self.appends.lock().unwrap().push((range.to_string(), rows));
            Ok(())
        }

        async fn update_values(
            &self,
            range: &str,
            rows: Vec<Vec<String>>,
        ) -> Result<(), InfraError> {
            self.updates.lock().unwrap().push((range.to_string(), rows));
            Ok(())
        }

        async fn batch_update_values(&self, data: Vec<ValueRange>) -> Result<(), InfraError> {
            self.batches.lock().unwrap().push(data);
            Ok(())
        }
    }

    fn header_row() -> Vec<String> {
        [
            "log_id",
            "locker_id",
            "user_email",
            "shoe_type",
            "recommended_minutes",
            "temperature",
            "humidity",
            "start_time",
            "finish_time",
            "pickup_time",
            "status",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn data_row(email: &str, status: &str) -> Vec<String> {
        [
            "0192f0c1-2345-7890-abcd-ef0123456789",
            "L001",
            email,
            "スニーカー",
            "45",
            "42.5",
            "18",
            "2025-11-01T10:00:00+07:00",
            "2025-11-01T10:45:00+07:00",
            "",
            status,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn new_session(email: &str) -> LockerSession {
        LockerSession::start(
            StartSession {
                locker_id:           LockerId::new("L001").unwrap(),
                user_email:          Email::new(email).unwrap(),
                shoe_type:           None,
                recommended_minutes: RecommendedMinutes::new(45).unwrap(),
                temperature:         None,
                humidity:            None,
            },
            DateTime::parse_from_rfc3339("2025-11-01T10:00:00+07:00").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_appendは11セルの行をa対k範囲に追記する() {
        let sheets = Arc::new(StubSheetsApi::default());
        let repo = SheetsSessionLogRepository::new(sheets.clone());
        let session = new_session("user@example.com");

        repo.append(&session).await.unwrap();

        let appends = sheets.appends.lock().unwrap();
        let (range, rows) = &appends[0];
        assert_eq!(range, "A:K");
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.len(), 11);
        assert_eq!(row[column::LOCKER_ID], "L001");
        assert_eq!(row[column::USER_EMAIL], "user@example.com");
        assert_eq!(row[column::RECOMMENDED_MINUTES], "45");
        assert_eq!(row[column::START_TIME], "2025-11-01T10:00:00+07:00");
        assert_eq!(row[column::FINISH_TIME], "2025-11-01T10:45:00+07:00");
        assert_eq!(row[column::PICKUP_TIME], "");
        assert_eq!(row[column::STATUS], "in_progress");
    }

    #[tokio::test]
    async fn test_list_allはヘッダー行をスキップして復元する() {
        let sheets = Arc::new(StubSheetsApi::with_rows(vec![
            header_row(),
            data_row("user@example.com", "in_progress"),
        ]));
        let repo = SheetsSessionLogRepository::new(sheets);

        let sessions = repo.list_all().await.unwrap();

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].row_number, 2);
        assert_eq!(sessions[0].session.user_email().as_str(), "user@example.com");
        assert_eq!(sessions[0].session.status(), SessionStatus::InProgress);
        assert_eq!(
            sessions[0].session.shoe_type().map(|s| s.as_str()),
            Some("スニーカー")
        );
        assert_eq!(sessions[0].session.temperature(), Some(42.5));
    }

    #[tokio::test]
    async fn test_list_allは形式不正の行をスキップして継続する() {
        let mut missing_finish = data_row("bad@example.com", "in_progress");
        missing_finish[column::FINISH_TIME] = String::new();

        let mut unknown_status = data_row("bad@example.com", "in_progress");
        unknown_status[column::STATUS] = "กำลังทำงาน".to_string();

        let sheets = Arc::new(StubSheetsApi::with_rows(vec![
            header_row(),
            missing_finish,
            data_row("good@example.com", "ready_for_pickup"),
            unknown_status,
        ]));
        let repo = SheetsSessionLogRepository::new(sheets);

        let sessions = repo.list_all().await.unwrap();

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].row_number, 3);
        assert_eq!(sessions[0].session.user_email().as_str(), "good@example.com");
    }

    #[tokio::test]
    async fn test_空のシートでは空のリストを返す() {
        let sheets = Arc::new(StubSheetsApi::default());
        let repo = SheetsSessionLogRepository::new(sheets);

        let sessions = repo.list_all().await.unwrap();

        assert!(sessions.is_empty());
    }

    #[tokio::test]
    async fn test_find_latest_activeは行順で最後のアクティブな行を返す() {
        let sheets = Arc::new(StubSheetsApi::with_rows(vec![
            header_row(),
            data_row("user@example.com", "in_progress"),
            data_row("other@example.com", "in_progress"),
            data_row("user@example.com", "picked_up"),
            data_row("user@example.com", "ready_for_pickup"),
        ]));
        let repo = SheetsSessionLogRepository::new(sheets);

        let email = Email::new("user@example.com").unwrap();
        let stored = repo.find_latest_active_by_email(&email).await.unwrap().unwrap();

        // 5 行目（最後のアクティブ行）。picked_up（4 行目）は対象外
        assert_eq!(stored.row_number, 5);
        assert_eq!(stored.session.status(), SessionStatus::ReadyForPickup);
    }

    #[tokio::test]
    async fn test_find_latest_activeはアクティブな行がなければnoneを返す() {
        let sheets = Arc::new(StubSheetsApi::with_rows(vec![
            header_row(),
            data_row("user@example.com", "picked_up"),
        ]));
        let repo = SheetsSessionLogRepository::new(sheets);

        let email = Email::new("user@example.com").unwrap();
        let stored = repo.find_latest_active_by_email(&email).await.unwrap();

        assert!(stored.is_none());
    }

    #[tokio::test]
    async fn test_mark_readyはk列のみを一括更新する() {
        let sheets = Arc::new(StubSheetsApi::default());
        let repo = SheetsSessionLogRepository::new(sheets.clone());

        repo.mark_ready(&[2, 5]).await.unwrap();

        let batches = sheets.batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(
            batches[0],
            vec![
                ValueRange {
                    range:  "K2".to_string(),
                    values: vec![vec!["ready_for_pickup".to_string()]],
                },
                ValueRange {
                    range:  "K5".to_string(),
                    values: vec![vec!["ready_for_pickup".to_string()]],
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_mark_readyは対象がなければapiを呼ばない() {
        let sheets = Arc::new(StubSheetsApi::default());
        let repo = SheetsSessionLogRepository::new(sheets.clone());

        repo.mark_ready(&[]).await.unwrap();

        assert!(sheets.batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_record_pickupはj対k範囲に時刻とステータスを書く() {
        let mut session = new_session("user@example.com");
        session
            .record_pickup(DateTime::parse_from_rfc3339("2025-11-01T11:30:00+07:00").unwrap())
            .unwrap();

        let sheets = Arc::new(StubSheetsApi::default());
        let repo = SheetsSessionLogRepository::new(sheets.clone());

        repo.record_pickup(&StoredSession {
            row_number: 4,
            session,
        })
        .await
        .unwrap();

        let updates = sheets.updates.lock().unwrap();
        let (range, rows) = &updates[0];
        assert_eq!(range, "J4:K4");
        assert_eq!(
            rows,
            &vec![vec![
                "2025-11-01T11:30:00+07:00".to_string(),
                "picked_up".to_string(),
            ]]
        );
    }

    #[tokio::test]
    async fn test_record_pickupは引き取り時刻のないセッションを拒否する() {
        let sheets = Arc::new(StubSheetsApi::default());
        let repo = SheetsSessionLogRepository::new(sheets);

        let err = repo
            .record_pickup(&StoredSession {
                row_number: 4,
                session:    new_session("user@example.com"),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.kind(),
            crate::error::InfraErrorKind::Unexpected(_)
        ));
    }
}
