//! Security subsystem.
//!
//! Only the quote API is rate limited; relay sessions are bounded by the
//! upstream provider's own limits and by external connection lifetimes.

pub mod rate_limit;
