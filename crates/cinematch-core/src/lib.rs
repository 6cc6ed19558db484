//! Core catalog model for cinematch.
//!
//! This crate defines the movie catalog entry, loads catalogs from CSV
//! sources with explicit missing-value normalization, and produces the
//! composite text documents consumed by the similarity engine.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod catalog;
pub mod error;
pub mod model;

pub use catalog::{load_catalog, load_catalog_file, Catalog};
pub use error::{DataLoadError, Result};
pub use model::CatalogEntry;
