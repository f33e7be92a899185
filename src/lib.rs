//! Floodgate - Sliding-Window Admission Control Service
//!
//! This crate implements a per-client admission check over an ordered
//! key-value store. Requests are counted in a trailing 60-second window;
//! a client that exhausts its window is placed under an escalating
//! cooldown. The limiter itself holds no mutable state, so any number of
//! replicas can share one store.

pub mod config;
pub mod error;
pub mod http;
pub mod ratelimit;
pub mod store;
