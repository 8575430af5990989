//! # Rank Tracker
//!
//! A backend for recording competitive game ranks and comparing them
//! across a user's connections.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (users, games, rank records, connections, activity)
//! - **calculate**: Rank aggregation over a user's history on one game
//! - **storage**: SQLite persistence through sqlx
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod storage;

pub use models::*;
