//! # 共通値オブジェクト
//!
//! 複数のモジュールで共有される値オブジェクトを定義する。
//!
//! ## 含まれる型
//!
//! | 型 | ラップ対象 | 用途 |
//! |---|-----------|------|
//! | [`Email`] | `String` | 利用者のメールアドレス |
//! | [`LockerId`] | `String` | ロッカー識別子（例: `L001`） |
//! | [`ShoeType`] | `String` | 靴の種類（利用者の自由入力） |
//! | [`RecommendedMinutes`] | `u32` | 推奨クリーニング時間（分） |

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// メールアドレス（値オブジェクト）
///
/// 生成時にバリデーションを実行し、不正な値の作成を防ぐ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// メールアドレスを作成する
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - `local@domain` の形式である
    /// - 最大 255 文字
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.is_empty() {
            return Err(DomainError::Validation(
                "メールアドレスは必須です".to_string(),
            ));
        }

        let Some((local, domain)) = value.split_once('@') else {
            return Err(DomainError::Validation(
                "メールアドレスの形式が不正です".to_string(),
            ));
        };

        if local.is_empty() || domain.is_empty() {
            return Err(DomainError::Validation(
                "メールアドレスの形式が不正です".to_string(),
            ));
        }

        if value.len() > 255 {
            return Err(DomainError::Validation(
                "メールアドレスは255文字以内である必要があります".to_string(),
            ));
        }

        Ok(Self(value))
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 所有権を持つ文字列に変換する
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

define_validated_string! {
    /// ロッカー識別子（値オブジェクト）
    ///
    /// キオスク筐体のロッカーを識別する（例: `L001`）。
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - 最大 32 文字
    pub struct LockerId {
        label: "ロッカー ID",
        max_length: 32,
    }
}

define_validated_string! {
    /// 靴の種類（値オブジェクト）
    ///
    /// キオスク画面での利用者の自由入力（例: スニーカー、革靴）。
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - 最大 100 文字
    pub struct ShoeType {
        label: "靴の種類",
        max_length: 100,
    }
}

/// 推奨クリーニング時間（分、値オブジェクト）
///
/// クリーニングサイクルの所要時間。仕上がり時刻の算出に使用する。
///
/// # 不変条件
///
/// - 1 分以上 1440 分（24 時間）以下
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecommendedMinutes(u32);

impl RecommendedMinutes {
    /// 1 日 = 1440 分。キオスクで受け付ける上限
    const MAX: u32 = 1440;

    /// 指定した値から推奨時間を作成する
    ///
    /// # エラー
    ///
    /// 0 または 1440 分超の場合は `DomainError::Validation` を返す。
    pub fn new(value: u32) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::Validation(
                "推奨クリーニング時間は 1 分以上である必要があります".to_string(),
            ));
        }

        if value > Self::MAX {
            return Err(DomainError::Validation(format!(
                "推奨クリーニング時間は {} 分以内である必要があります",
                Self::MAX
            )));
        }

        Ok(Self(value))
    }

    /// 内部の u32 値を取得する
    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// `chrono::Duration` に変換する（仕上がり時刻の算出用）
    pub fn as_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.0))
    }
}

impl TryFrom<i64> for RecommendedMinutes {
    type Error = DomainError;

    /// i64 から変換を試みる（リクエスト層の数値から）
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let value = u32::try_from(value).map_err(|_| {
            DomainError::Validation(
                "推奨クリーニング時間は正の整数である必要があります".to_string(),
            )
        })?;
        Self::new(value)
    }
}

impl std::fmt::Display for RecommendedMinutes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
