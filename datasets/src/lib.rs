//! `bnlearn-datasets` provides a collection of categorical datasets ready to be used in tests,
//! benchmarks and demos.
//!
//! ## Current State
//!
//! Currently the following datasets are provided, each together with the structure of the
//! network which generated it:
//!
//! * `["sprinkler"]` : 1000 observations of the four variable sprinkler network
//! * `["asia"]` : 5000 observations of the eight variable Asia (lung cancer) network
//!
//! Loaded datasets are returned as a [`bnlearn::Dataset`] of `String` labels with named
//! columns, in the node order of the matching structure.
//!
//! ## Using a dataset
//!
//! To use one of the provided datasets in your project add the crate to your Cargo.toml with the
//! corresponding feature enabled:
//! ```ignore
//! bnlearn-datasets = { version = "0.1.0", features = ["sprinkler"] }
//! ```
//! and then use it in your example or tests as
//! ```ignore
//! let dataset = bnlearn_datasets::sprinkler();
//! let structure = bnlearn_datasets::sprinkler_structure();
//! ```

pub mod dataset;
pub use dataset::*;
