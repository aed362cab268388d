//! # Kiosk API ライブラリ
//!
//! Kiosk API のルーター・ハンドラ・ユースケースを公開する。
//! テストからルーターを直接組み立てられるようにするためのライブラリクレート。

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
