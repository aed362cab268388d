//! # リポジトリ実装
//!
//! ドメインエンティティと外部ストア（スプレッドシート）の間の読み書きを
//! 担当する。トレイトで抽象化し、ユースケース層はトレイトにのみ依存する。

mod session_log_repository;

pub use session_log_repository::{
    SessionLogRepository,
    SheetsSessionLogRepository,
    StoredSession,
};
