//! # Clock（時刻プロバイダ）
//!
//! 仕上がり時刻の判定はすべて「現在時刻」との比較で行われるため、
//! `Utc::now()` の直接呼び出しをトレイトに置き換え、
//! テストで任意の時刻を注入できるようにする。

use chrono::{DateTime, Utc};

/// 現在時刻を提供するトレイト
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 実際のシステム時刻を返す実装
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 固定時刻を返すテスト用実装
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// RFC 3339 文字列から固定時刻を作成する（テスト用ヘルパー）
    ///
    /// # パニック
    ///
    /// パース不能な文字列を渡すとパニックする。テスト専用。
    pub fn at(rfc3339: &str) -> Self {
        Self {
            now: DateTime::parse_from_rfc3339(rfc3339)
                .expect("FixedClock::at には RFC 3339 文字列を渡すこと")
                .with_timezone(&Utc),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clockは単調に進む現在時刻を返す() {
        let clock = SystemClock;
        let before = Utc::now();
        let now = clock.now();
        let after = Utc::now();

        assert!(before <= now && now <= after);
    }

    #[test]
    fn test_fixed_clockは注入した時刻をそのまま返す() {
        let clock = FixedClock::at("2025-11-01T10:00:00+07:00");

        assert_eq!(clock.now().to_rfc3339(), "2025-11-01T03:00:00+00:00");
        // 何度呼んでも同じ時刻
        assert_eq!(clock.now(), clock.now());
    }
}
