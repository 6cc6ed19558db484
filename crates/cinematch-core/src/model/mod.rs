pub mod entry;

pub use entry::{CatalogEntry, STAR_COUNT};
