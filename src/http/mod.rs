//! HTTP transport for the rate limiter.

mod handler;
mod server;

pub use handler::router;
pub use server::HttpServer;
