//! # ShoeLocker ドメイン層
//!
//! スマートシューロッカーのビジネスルールを表現するドメイン層。
//!
//! ## 設計方針
//!
//! - **Newtype パターン**: ID・メールアドレス等はプリミティブをラップし、
//!   生成時にバリデーションを行う
//! - **状態遷移はメソッド経由**: セッションのステータス変更は
//!   [`session::LockerSession`] のメソッドでのみ行い、不正な遷移を
//!   `DomainError` として返す
//! - **インフラ非依存**: スプレッドシートやメール API の詳細を知らない。
//!   永続化・送信はインフラ層のトレイト実装が担当する
//!
//! ## モジュール構成
//!
//! - [`session`] - ロッカーセッションエンティティとステータスライフサイクル
//! - [`value_objects`] - 共通値オブジェクト（Email, LockerId など）
//! - [`clock`] - 時刻プロバイダ抽象
//! - [`notification`] - メール通知のドメインモデル
//! - [`error`] - ドメイン層エラー定義

#[macro_use]
mod macros;

pub mod clock;
pub mod error;
pub mod notification;
pub mod session;
pub mod value_objects;

pub use error::DomainError;
