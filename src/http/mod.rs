//! HTTP surfaces: REST API and web portal. Thin glue over the store.

mod api_routes;
mod server;
mod web_routes;

pub use server::{AppState, HttpServer};
