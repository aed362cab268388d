//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、ロジックはユースケース層に委譲

pub mod health;
pub mod pickup_shoes;
pub mod send_email;
pub mod start_work;
pub mod update_status;

pub use health::health_check;
pub use pickup_shoes::{PickupShoesRequest, PickupShoesResponse, PickupState, pickup_shoes};
pub use send_email::{SendEmailRequest, SendEmailResponse, SendEmailState, send_email};
pub use start_work::{StartWorkRequest, StartWorkResponse, StartWorkState, start_work};
pub use update_status::{UpdateStatusResponse, UpdateStatusState, update_status};
