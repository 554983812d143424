//! # Water-Trace Test Suite
//!
//! Cross-subsystem tests run against the wired runtime, plus benchmarks.
//!
//! ## Test Categories
//!
//! ```text
//! tests/
//! ├── fixtures.rs               # TestTrace: container on a manual clock
//! └── integration/
//!     ├── scenarios.rs          # End-to-end unit and report walkthroughs
//!     ├── dispatch_rules.rs     # Check ordering and the closed transition table
//!     ├── concurrency.rs        # Racing commands on one unit
//!     ├── properties.rs         # Random walks, verify round-trip
//!     ├── disclosure.rs         # NotFound indistinguishability, no cascade
//!     └── wire.rs               # Canonical JSON schema
//! benches/
//! └── dispatch_benchmarks.rs    # Table lookup, classification, full dispatch
//! ```
//!
//! ## Running
//!
//! ```bash
//! cargo test -p wt-tests
//! cargo bench -p wt-tests
//! ```

#![allow(dead_code)]

pub mod fixtures;
pub mod integration;
