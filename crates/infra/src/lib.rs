//! # ShoeLocker インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **スプレッドシート接続**: Google Sheets v4 REST API クライアントと
//!   サービスアカウント認証
//! - **リポジトリ実装**: セッションログ（シート 1 枚）への読み書き
//! - **メール送信**: Resend / SMTP / Noop の 3 バックエンド
//!
//! ## 依存関係
//!
//! ```text
//! kiosk-api → infra → domain
//!        ↘      ↓
//!          shared
//! ```
//!
//! インフラ層は `domain` に依存する。
//! ドメイン層はインフラ層に依存しない（依存性逆転の原則）。
//!
//! ## モジュール構成
//!
//! - [`sheets`] - Google Sheets API クライアント
//! - [`repository`] - セッションログリポジトリ
//! - [`notification`] - メール送信バックエンド
//! - [`error`] - インフラ層エラー定義

pub mod error;
pub mod notification;
pub mod repository;
pub mod sheets;

pub use error::InfraError;
