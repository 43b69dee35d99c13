//! Pipeline stages for menu fusion.
//!
//! - `snapshot`: Fetch raw vendor documents once per run
//! - `invoke`: Failure-isolating extraction wrapper
//! - `fuse`: Cross-vendor fusion per record kind
//! - `remap`: Destination identifier column names
//! - `tables`: Memoized canonical tables
//! - `load`: Batched writes into a store

pub mod fuse;
pub mod invoke;
pub mod load;
pub mod remap;
mod run;
pub mod snapshot;
pub mod tables;

pub use fuse::{Fusion, Source, fuse, fuse_categories, fuse_foods, fuse_nutrients, fuse_periods};
pub use invoke::{Invocation, Outcome, safe_invoke};
pub use remap::remap_ids;
pub use run::{run_fusion, run_load, write_tables};
pub use snapshot::{MenuSnapshot, VendorFeed};
pub use tables::{Canonical, MenuTables};
