//! # Testing Utilities
//!
//! This module provides utilities for testing grammars and parsers,
//! including random input generation and snapshot support.
//!
//! ## Input Generation
//!
//! [`InputGenerator`] walks a grammar's expression trees and produces
//! strings the grammar is likely to accept; [`InputFuzzer`] mutates
//! them into near-miss inputs. Both are deterministic under a fixed
//! seed, which makes them usable inside `proptest` properties and
//! fuzz harnesses alike.
//!
//! ## Snapshot Testing
//!
//! [`SnapshotTester`] compares formatted parse trees against files on
//! disk and rewrites them when `UPDATE_SNAPSHOTS` is set.

pub mod generators;
pub mod snapshot;

pub use generators::*;
pub use snapshot::*;
