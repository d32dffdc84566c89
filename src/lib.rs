// The binary entry point is main.rs; this file re-declares the module tree so
// integration tests can drive the exam through `khatwa::exam::*`.
// Most UI code is only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

rust_i18n::i18n!("locales", fallback = "en");

pub mod app;
pub mod config;
pub mod event;
pub mod exam;
pub mod logging;
pub mod store;
pub mod ui;
