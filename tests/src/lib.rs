//! # Tangle Node Test Suite
//!
//! Cross-crate scenarios that need more than one subsystem at a time.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/
//! │   ├── fixtures.rs               # Ledger harness, bundle builders
//! │   └── integration/
//! │       ├── ledger_properties.rs  # Conservation, ordering, determinism
//! │       ├── walk_validation.rs    # Tip selection over a real ledger
//! │       └── validator_rotation.rs # Candidate tracker end to end
//! └── benches/
//!     └── ledger_benchmarks.rs      # Balance diff and round application
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All scenarios
//! cargo test -p tangle-tests
//!
//! # One area
//! cargo test -p tangle-tests integration::walk_validation
//!
//! # Benchmarks
//! cargo bench -p tangle-tests
//! ```

pub mod fixtures;
pub mod integration;
