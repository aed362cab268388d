//! # ロッカーセッション
//!
//! クリーニングサイクル 1 回分のセッションを表現するエンティティ。
//! スプレッドシートの 1 行に対応し、開始・仕上がり判定・引き取りの
//! ライフサイクルを持つ。
//!
//! ## ライフサイクル
//!
//! ```text
//! in_progress ──（仕上がり時刻経過）──▶ ready_for_pickup
//!      │                                      │
//!      └──────（仕上がり時刻経過後の引き取り）─┴──▶ picked_up（終端）
//! ```
//!
//! `picked_up` は終端状態であり、以降いかなる遷移も許可されない。

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::{
    DomainError,
    value_objects::{Email, LockerId, RecommendedMinutes, ShoeType},
};

define_uuid_id! {
    /// セッションログ ID（一意識別子）
    ///
    /// スプレッドシート行の主キー相当。UUID v7 を使用し、生成順に
    /// ソート可能。
    pub struct LogId;
}

/// セッションステータス
///
/// スプレッドシートの `status` 列に格納される値。
/// snake_case でシリアライズされる。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionStatus {
    /// クリーニングサイクル実行中
    InProgress,
    /// 仕上がり済み・引き取り待ち
    ReadyForPickup,
    /// 利用者が引き取り済み（終端状態）
    PickedUp,
}

impl std::str::FromStr for SessionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(Self::InProgress),
            "ready_for_pickup" => Ok(Self::ReadyForPickup),
            "picked_up" => Ok(Self::PickedUp),
            _ => Err(DomainError::Validation(format!(
                "不正なセッションステータス: {}",
                s
            ))),
        }
    }
}

impl SessionStatus {
    /// アクティブなステータスかどうか
    ///
    /// アクティブ = 利用者の靴がまだロッカー内にある状態
    /// （`in_progress` または `ready_for_pickup`）。
    pub fn is_active(&self) -> bool {
        matches!(self, Self::InProgress | Self::ReadyForPickup)
    }
}

/// ロッカーセッションエンティティ
///
/// クリーニングサイクル 1 回分を表現する。start-work で作成され、
/// update-status の巡回で `ready_for_pickup` に、pickup-shoes で
/// `picked_up` に遷移する。
///
/// # 不変条件
///
/// - `finishes_at` は常に `started_at + recommended_minutes`
/// - `picked_up_at` が Some なのは `status == PickedUp` のときのみ
/// - `picked_up` からの遷移は存在しない
#[derive(Debug, Clone, PartialEq)]
pub struct LockerSession {
    log_id: LogId,
    locker_id: LockerId,
    user_email: Email,
    shoe_type: Option<ShoeType>,
    recommended_minutes: RecommendedMinutes,
    temperature: Option<f64>,
    humidity: Option<f64>,
    started_at: DateTime<FixedOffset>,
    finishes_at: DateTime<FixedOffset>,
    picked_up_at: Option<DateTime<FixedOffset>>,
    status: SessionStatus,
}

/// セッション開始時の入力（センサー値などの任意項目を含む）
///
/// start-work リクエストから組み立てられる。
#[derive(Debug, Clone)]
pub struct StartSession {
    pub locker_id:           LockerId,
    pub user_email:          Email,
    pub shoe_type:           Option<ShoeType>,
    pub recommended_minutes: RecommendedMinutes,
    pub temperature:         Option<f64>,
    pub humidity:            Option<f64>,
}

impl LockerSession {
    /// 新しいセッションを開始する
    ///
    /// 仕上がり時刻は `started_at + recommended_minutes` で算出する。
    ///
    /// # 引数
    ///
    /// - `input`: セッション開始の入力
    /// - `started_at`: 開始時刻（キオスクのタイムゾーンで、呼び出し元から注入）
    pub fn start(input: StartSession, started_at: DateTime<FixedOffset>) -> Self {
        let finishes_at = started_at + input.recommended_minutes.as_duration();

        Self {
            log_id: LogId::new(),
            locker_id: input.locker_id,
            user_email: input.user_email,
            shoe_type: input.shoe_type,
            recommended_minutes: input.recommended_minutes,
            temperature: input.temperature,
            humidity: input.humidity,
            started_at,
            finishes_at,
            picked_up_at: None,
            status: SessionStatus::InProgress,
        }
    }

    /// 既存のデータからセッションを復元する（スプレッドシートから取得時）
    #[allow(clippy::too_many_arguments)]
    pub fn from_sheet(
        log_id: LogId,
        locker_id: LockerId,
        user_email: Email,
        shoe_type: Option<ShoeType>,
        recommended_minutes: RecommendedMinutes,
        temperature: Option<f64>,
        humidity: Option<f64>,
        started_at: DateTime<FixedOffset>,
        finishes_at: DateTime<FixedOffset>,
        picked_up_at: Option<DateTime<FixedOffset>>,
        status: SessionStatus,
    ) -> Self {
        Self {
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
        }
    }

    // ===== アクセサ =====

    pub fn log_id(&self) -> &LogId {
        &self.log_id
    }

    pub fn locker_id(&self) -> &LockerId {
        &self.locker_id
    }

    pub fn user_email(&self) -> &Email {
        &self.user_email
    }

    pub fn shoe_type(&self) -> Option<&ShoeType> {
        self.shoe_type.as_ref()
    }

    pub fn recommended_minutes(&self) -> RecommendedMinutes {
        self.recommended_minutes
    }

    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    pub fn humidity(&self) -> Option<f64> {
        self.humidity
    }

    pub fn started_at(&self) -> DateTime<FixedOffset> {
        self.started_at
    }

    pub fn finishes_at(&self) -> DateTime<FixedOffset> {
        self.finishes_at
    }

    pub fn picked_up_at(&self) -> Option<DateTime<FixedOffset>> {
        self.picked_up_at
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// アクティブなセッションかどうか（靴がまだロッカー内にあるか）
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    // ===== 状態遷移 =====

    /// 仕上がり時刻が経過したかどうか
    ///
    /// 比較は時点（instant）同士で行うため、`now` のオフセットが
    /// `finishes_at` のオフセットと異なっていても正しく判定される。
    /// 境界は含む（`now == finishes_at` は経過扱い）。
    pub fn deadline_elapsed(&self, now: DateTime<FixedOffset>) -> bool {
        now >= self.finishes_at
    }

    /// `ready_for_pickup` に遷移する
    ///
    /// # エラー
    ///
    /// - 仕上がり時刻前の場合は `DeadlineNotElapsed`
    /// - `in_progress` 以外からの遷移は `InvalidTransition`
    pub fn mark_ready(&mut self, now: DateTime<FixedOffset>) -> Result<(), DomainError> {
        if self.status != SessionStatus::InProgress {
            return Err(DomainError::InvalidTransition {
                from: self.status.into(),
                to:   SessionStatus::ReadyForPickup.into(),
            });
        }

        if !self.deadline_elapsed(now) {
            return Err(DomainError::DeadlineNotElapsed {
                finishes_at: self.finishes_at,
            });
        }

        self.status = SessionStatus::ReadyForPickup;
        Ok(())
    }

    /// 引き取りを記録し、`picked_up` に遷移する
    ///
    /// 引き取り時刻として `now` をそのまま記録する。
    ///
    /// # エラー
    ///
    /// - すでに `picked_up` の場合は `InvalidTransition`（終端状態）
    /// - 仕上がり時刻前の場合は `DeadlineNotElapsed`。呼び出し側は
    ///   これを「処理中」の正常応答に変換する
    pub fn record_pickup(&mut self, now: DateTime<FixedOffset>) -> Result<(), DomainError> {
        if !self.is_active() {
            return Err(DomainError::InvalidTransition {
                from: self.status.into(),
                to:   SessionStatus::PickedUp.into(),
            });
        }

        if !self.deadline_elapsed(now) {
            return Err(DomainError::DeadlineNotElapsed {
                finishes_at: self.finishes_at,
            });
        }

        self.picked_up_at = Some(now);
        self.status = SessionStatus::PickedUp;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn kiosk_time(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    fn start_at(rfc3339: &str, minutes: u32) -> LockerSession {
        LockerSession::start(
            StartSession {
                locker_id:           LockerId::new("L001").unwrap(),
                user_email:          Email::new("user@example.com").unwrap(),
                shoe_type:           Some(ShoeType::new("スニーカー").unwrap()),
                recommended_minutes: RecommendedMinutes::new(minutes).unwrap(),
                temperature:         Some(42.5),
                humidity:            Some(18.0),
            },
            kiosk_time(rfc3339),
        )
    }

    // ===== SessionStatus のテスト =====

    #[rstest]
    #[case(SessionStatus::InProgress, "in_progress")]
    #[case(SessionStatus::ReadyForPickup, "ready_for_pickup")]
    #[case(SessionStatus::PickedUp, "picked_up")]
    fn test_ステータスの文字列表現はsnake_case(
        #[case] status: SessionStatus,
        #[case] expected: &str,
    ) {
        assert_eq!(status.to_string(), expected);
        assert_eq!(SessionStatus::from_str(expected).unwrap(), status);
    }

    #[test]
    fn test_不明なステータス文字列は拒否される() {
        assert!(SessionStatus::from_str("กำลังทำงาน").is_err());
        assert!(SessionStatus::from_str("").is_err());
    }

    #[rstest]
    #[case(SessionStatus::InProgress, true)]
    #[case(SessionStatus::ReadyForPickup, true)]
    #[case(SessionStatus::PickedUp, false)]
    fn test_アクティブ判定(#[case] status: SessionStatus, #[case] expected: bool) {
        assert_eq!(status.is_active(), expected);
    }

    // ===== 開始のテスト =====

    #[test]
    fn test_開始時は仕上がり時刻が推奨時間後になる() {
        let session = start_at("2025-11-01T10:00:00+07:00", 45);

        assert_eq!(session.status(), SessionStatus::InProgress);
        assert_eq!(session.started_at(), kiosk_time("2025-11-01T10:00:00+07:00"));
        assert_eq!(session.finishes_at(), kiosk_time("2025-11-01T10:45:00+07:00"));
        assert_eq!(session.picked_up_at(), None);
    }

    // ===== 仕上がり判定のテスト =====

    #[rstest]
    #[case("2025-11-01T10:44:59+07:00", false)]
    #[case("2025-11-01T10:45:00+07:00", true)] // 境界は含む
    #[case("2025-11-01T10:45:01+07:00", true)]
    fn test_仕上がり判定は境界を含む(#[case] now: &str, #[case] expected: bool) {
        let session = start_at("2025-11-01T10:00:00+07:00", 45);
        assert_eq!(session.deadline_elapsed(kiosk_time(now)), expected);
    }

    #[test]
    fn test_仕上がり判定はオフセットが異なっても時点で比較される() {
        let session = start_at("2025-11-01T10:00:00+07:00", 45);
        // UTC 03:45 = バンコク 10:45
        assert!(session.deadline_elapsed(kiosk_time("2025-11-01T03:45:00+00:00")));
        assert!(!session.deadline_elapsed(kiosk_time("2025-11-01T03:44:00+00:00")));
    }

    // ===== mark_ready のテスト =====

    #[test]
    fn test_仕上がり後のmark_readyは成功する() {
        let mut session = start_at("2025-11-01T10:00:00+07:00", 45);

        session.mark_ready(kiosk_time("2025-11-01T11:00:00+07:00")).unwrap();

        assert_eq!(session.status(), SessionStatus::ReadyForPickup);
    }

    #[test]
    fn test_仕上がり前のmark_readyは拒否される() {
        let mut session = start_at("2025-11-01T10:00:00+07:00", 45);

        let err = session
            .mark_ready(kiosk_time("2025-11-01T10:30:00+07:00"))
            .unwrap_err();

        assert!(matches!(err, DomainError::DeadlineNotElapsed { .. }));
        assert_eq!(session.status(), SessionStatus::InProgress);
    }

    #[test]
    fn test_引き取り済みセッションのmark_readyは拒否される() {
        let mut session = start_at("2025-11-01T10:00:00+07:00", 45);
        session.record_pickup(kiosk_time("2025-11-01T11:00:00+07:00")).unwrap();

        let err = session
            .mark_ready(kiosk_time("2025-11-01T12:00:00+07:00"))
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidTransition { .. }));
        assert_eq!(session.status(), SessionStatus::PickedUp);
    }

    // ===== record_pickup のテスト =====

    #[test]
    fn test_仕上がり後の引き取りは時刻を記録して終端状態になる() {
        let mut session = start_at("2025-11-01T10:00:00+07:00", 45);
        let pickup_time = kiosk_time("2025-11-01T11:30:00+07:00");

        session.record_pickup(pickup_time).unwrap();

        assert_eq!(session.status(), SessionStatus::PickedUp);
        assert_eq!(session.picked_up_at(), Some(pickup_time));
    }

    #[test]
    fn test_ready_for_pickupからの引き取りも成功する() {
        let mut session = start_at("2025-11-01T10:00:00+07:00", 45);
        session.mark_ready(kiosk_time("2025-11-01T11:00:00+07:00")).unwrap();

        session.record_pickup(kiosk_time("2025-11-01T11:30:00+07:00")).unwrap();

        assert_eq!(session.status(), SessionStatus::PickedUp);
    }

    #[test]
    fn test_仕上がり前の引き取りは仕上がり時刻を添えて拒否される() {
        let mut session = start_at("2025-11-01T10:00:00+07:00", 45);

        let err = session
            .record_pickup(kiosk_time("2025-11-01T10:10:00+07:00"))
            .unwrap_err();

        let DomainError::DeadlineNotElapsed { finishes_at } = err else {
            panic!("DeadlineNotElapsed であること: {err}");
        };
        assert_eq!(finishes_at, kiosk_time("2025-11-01T10:45:00+07:00"));
        assert_eq!(session.picked_up_at(), None);
    }

    #[test]
    fn test_二重の引き取りは拒否される() {
        let mut session = start_at("2025-11-01T10:00:00+07:00", 45);
        let first = kiosk_time("2025-11-01T11:00:00+07:00");
        session.record_pickup(first).unwrap();

        let err = session
            .record_pickup(kiosk_time("2025-11-01T12:00:00+07:00"))
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidTransition { .. }));
        // 最初の引き取り時刻が保持される
        assert_eq!(session.picked_up_at(), Some(first));
    }
}
