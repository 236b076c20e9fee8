//! Integration tests for lapblend crates.
//!
//! End-to-end flows that cross crate boundaries: files on disk are decoded
//! by `lapblend-io`, blended by `lapblend-ops` and encoded again.
