//! Service layer for the menu fusion pipeline.
//!
//! This module contains the business logic for:
//! - Raw document fetching (`MenuSource`, `HttpMenuSource`)
//! - Per-vendor record extraction (`MenuExtractor`)
//! - Restaurant and building extraction (`locations`)

mod extractor;
pub mod locations;
mod source;

pub use extractor::MenuExtractor;
pub use source::{HttpMenuSource, MenuSource};
