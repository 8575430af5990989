//! Row identifiers.
//!
//! Every table uses an SQLite `INTEGER PRIMARY KEY`, so identifiers are
//! plain `i64` values. The aliases document which table a value points at.

/// Type alias for user IDs
pub type UserId = i64;

/// Type alias for game IDs
pub type GameId = i64;

/// Type alias for rank record IDs
pub type RankId = i64;

/// Type alias for connection request IDs
pub type RequestId = i64;

/// Type alias for user connection IDs
pub type ConnectionId = i64;

/// Type alias for activity log entry IDs
pub type LogId = i64;
