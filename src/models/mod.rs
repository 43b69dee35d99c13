// src/models/mod.rs

//! Domain models for the menu fusion pipeline.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod menu;
mod records;
mod table;
mod vendor;

// Re-export all public types
pub use config::{ApiConfig, Config, HeaderConfig, LoggingConfig, PathsConfig, StoreConfig};
pub use menu::{Menu, MenuDocument, Nested, PeriodSet, RawCategory, RawItem, RawNutrient, RawPeriod, Shape};
pub use records::{Category, Dataset, Food, Nutrient, Period, RecordKind, Restaurant, VendorId};
pub use table::{Row, Table};
pub use vendor::VendorSpec;
