//! HTTP API: server wiring, routing, and the request/response boundary.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod middleware;
