//! # datediff-server
//!
//! HTTP front end for [`datediff_engine`]: a REST endpoint and a GraphQL
//! endpoint over the same calculator.
//!
//! ## Modules
//!
//! - [`app`] — router, shared state, serve loop
//! - [`rest`] — `POST /V1/datetime/calculate`
//! - [`graphql`] — `DiffCalculatorQuery`
//! - [`config`] — layered configuration (defaults → YAML → env)
//! - [`logging`] — tracing subscriber setup

pub mod app;
pub mod config;
pub mod graphql;
pub mod logging;
pub mod rest;

pub use app::{build_app, router, serve, AppState};
pub use config::AppConfig;
