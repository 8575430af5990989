pub mod activity;
pub mod connections;
pub mod games;
pub mod ranks;
pub mod users;
