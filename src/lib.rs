// Library target for the integration tests and criterion benchmarks.
// The binary entry point is main.rs; it re-declares the same module tree.
// Some code is only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

pub mod app;
pub mod config;
pub mod engine;
pub mod event;
pub mod session;
pub mod speech;
pub mod store;
pub mod ui;
