//! Core data models for the rank tracker.

mod activity;
mod connection;
mod game;
mod ids;
mod rank;
mod user;

pub use activity::*;
pub use connection::*;
pub use game::*;
pub use ids::*;
pub use rank::*;
pub use user::*;
