//! CSV catalog loader.
//!
//! Reads the IMDb top-1000 column layout. Required columns are checked up
//! front so a malformed source fails as a whole rather than row by row.
//! Every optional or empty cell is normalized to `""`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;

use crate::catalog::Catalog;
use crate::error::{DataLoadError, Result};
use crate::model::CatalogEntry;

/// Columns that must be present in every catalog source.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "Series_Title",
    "Genre",
    "Director",
    "Star1",
    "Star2",
    "Star3",
    "Star4",
    "Overview",
];

/// One CSV row as it appears in the source. Empty cells deserialize to `None`.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Series_Title")]
    title: Option<String>,
    #[serde(rename = "Genre")]
    genre: Option<String>,
    #[serde(rename = "Director")]
    director: Option<String>,
    #[serde(rename = "Star1")]
    star1: Option<String>,
    #[serde(rename = "Star2")]
    star2: Option<String>,
    #[serde(rename = "Star3")]
    star3: Option<String>,
    #[serde(rename = "Star4")]
    star4: Option<String>,
    #[serde(rename = "Overview")]
    overview: Option<String>,
    #[serde(rename = "Released_Year", default)]
    released_year: Option<String>,
    #[serde(rename = "Poster_Link", default)]
    poster_link: Option<String>,
    #[serde(rename = "IMDB_Rating", default)]
    rating: Option<String>,
    #[serde(rename = "Gross", default)]
    gross: Option<String>,
}

impl RawRecord {
    fn normalize(self) -> CatalogEntry {
        CatalogEntry {
            title: self.title.unwrap_or_default(),
            genre: self.genre.unwrap_or_default(),
            director: self.director.unwrap_or_default(),
            stars: [
                self.star1.unwrap_or_default(),
                self.star2.unwrap_or_default(),
                self.star3.unwrap_or_default(),
                self.star4.unwrap_or_default(),
            ],
            overview: self.overview.unwrap_or_default(),
            released_year: self.released_year.unwrap_or_default(),
            poster_link: self.poster_link.unwrap_or_default(),
            rating: self.rating.unwrap_or_default(),
            gross: self.gross.unwrap_or_default(),
        }
    }
}

fn check_required_columns(headers: &StringRecord) -> Result<()> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == **required))
        .map(|c| (*c).to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DataLoadError::MissingColumns(missing))
    }
}

/// Load a catalog from any CSV source with a header row.
///
/// Row order is preserved; it becomes the position index used by the
/// similarity matrix.
///
/// # Errors
///
/// Returns [`DataLoadError::MissingColumns`] when any required column is
/// absent and [`DataLoadError::Csv`] when a row cannot be parsed.
pub fn load_catalog<R: Read>(source: R) -> Result<Catalog> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(source);

    check_required_columns(reader.headers()?)?;

    let mut entries = Vec::new();
    for record in reader.deserialize::<RawRecord>() {
        entries.push(record?.normalize());
    }

    log::debug!("Loaded {} catalog entries", entries.len());
    Ok(Catalog::new(entries))
}

/// Load a catalog from a CSV file on disk.
///
/// # Errors
///
/// Returns [`DataLoadError::Io`] when the file cannot be opened, otherwise
/// the same errors as [`load_catalog`].
pub fn load_catalog_file(path: &Path) -> Result<Catalog> {
    let file = File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let catalog = load_catalog(file)?;
    log::info!(
        "Loaded catalog of {} movies from {}",
        catalog.len(),
        path.display()
    );
    Ok(catalog)
}
