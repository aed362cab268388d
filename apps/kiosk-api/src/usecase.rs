//! # ユースケース
//!
//! 各ハンドラに対応するアプリケーションロジックを定義する。
//!
//! ## 設計方針
//!
//! - ユースケースはリポジトリ・時計・送信手段のトレイトにのみ依存する
//!   （`Arc<dyn ...>` で注入し、テストではスタブに差し替える）
//! - タイムスタンプはキオスクのタイムゾーン（固定オフセット）に変換して扱う
//! - ステータス遷移の判定はドメインエンティティに委譲する

pub mod notification;
pub mod pickup;
pub mod start_work;
pub mod update_status;

pub use notification::{NotificationService, TemplateRenderer};
pub use pickup::{PickupOutcome, PickupUseCase};
pub use start_work::{StartWorkInput, StartWorkUseCase};
pub use update_status::UpdateStatusUseCase;
