// Library target exists for the integration tests and criterion benches.
// The binary entry point is main.rs; this file re-declares the module tree
// so harnesses can import types via `vocadrill::engine::*` etc.
// Most code is only exercised through the binary, so suppress dead_code
// warnings.
#![allow(dead_code)]

// Public: used directly by tests and benches
pub mod engine;
pub mod error;
pub mod generator;
pub mod session;
pub mod store;

// Private: required transitively (won't compile without them)
mod app;
mod config;
mod event;
mod ui;
