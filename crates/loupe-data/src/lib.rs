//! # loupe-data
//!
//! Reads a collection dataset, where each collection bundles a description,
//! an image and a time series of five market metrics, and walks the series
//! one fixed-length window at a time.
//!
//! This crate provides:
//! - [`CollectionCatalog`] — ordinal to name lookup over a split directory
//! - [`ResourceFetcher`] / [`FsFetcher`] — description, image and series loaders
//! - [`CollectionCache`] — single-entry cache for the current collection
//! - [`WindowCursor`] — the windowing state machine with rollover
//! - [`CollectionDataset`] — `len` / `get_features` / `get_window` facade
//!
//! Logging goes through `tracing`; install a subscriber to see it.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod cursor;
pub mod dataset;
pub mod error;
pub mod fetch;
pub mod series;

pub use cache::{CollectionCache, FeatureBundle};
pub use catalog::CollectionCatalog;
pub use config::{DatasetConfig, Split, IMAGE_SIZE, WINDOW_LEN};
pub use cursor::{CursorState, WindowCursor, WindowStep};
pub use dataset::CollectionDataset;
pub use error::{Error, Result};
pub use fetch::{FsFetcher, ResourceFetcher};
pub use series::{MetricRow, TimeSeries, FIELD_NAMES, NUM_FIELDS};
