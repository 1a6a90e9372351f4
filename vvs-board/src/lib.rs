//! VVS station departure board.
//!
//! Periodically fetches the departure feed for one station, normalizes
//! each record into display-ready fields, filters by time window,
//! direction and line, and hands the result to a consumer on a jittered
//! schedule. Rendering is the consumer's job; this crate ends at the
//! callback.

pub mod filter;
pub mod normalize;
pub mod poll;
pub mod schedule;
pub mod vvs;
