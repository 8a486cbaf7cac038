//! GhostChat development API server.
//!
//! Serves `POST /chat`, which streams a canned reply as UI message stream
//! frames, and `GET /health`. Intended for exercising chat front-ends without
//! a real model behind them.

pub mod api;
pub mod config;
pub mod server;

pub use config::ServerConfig;
pub use server::{ServerError, ServerHandle, build_app, start_server};
