//! In-memory model of a parsed CAN network.
//!
//! Everything here is produced by the lowering pass and immutable afterwards:
//! the structs expose getters only, and the arenas inside
//! [`Network`](network::Network) are never touched again once loading returns.

pub mod attributes;
pub mod bit_timing;
pub mod message;
pub mod network;
pub mod node;
pub mod signal;
pub mod value_table;
