use serde::{Deserialize, Serialize};

/// Number of lead actors carried per catalog entry.
pub const STAR_COUNT: usize = 4;

/// A single movie in the catalog.
///
/// Every textual field is an always-defined string: absent values are
/// normalized to `""` at ingestion, so the composite document built from an
/// entry is never missing a part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub title: String,

    /// Comma-separated genre list as it appears in the source (e.g. "Crime, Drama").
    pub genre: String,

    pub director: String,

    /// Lead actors in billing order.
    pub stars: [String; STAR_COUNT],

    /// Free-text synopsis.
    pub overview: String,

    /// Display-only metadata. Never vectorized.
    pub released_year: String,
    pub poster_link: String,
    pub rating: String,
    pub gross: String,
}

impl CatalogEntry {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = genre.into();
        self
    }

    #[must_use]
    pub fn with_director(mut self, director: impl Into<String>) -> Self {
        self.director = director.into();
        self
    }

    /// Set the lead actors. Extra names beyond [`STAR_COUNT`] are ignored and
    /// missing slots stay empty.
    #[must_use]
    pub fn with_stars<I, S>(mut self, stars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for (slot, star) in self.stars.iter_mut().zip(stars) {
            *slot = star.into();
        }
        self
    }

    #[must_use]
    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = overview.into();
        self
    }

    #[must_use]
    pub fn with_released_year(mut self, year: impl Into<String>) -> Self {
        self.released_year = year.into();
        self
    }

    #[must_use]
    pub fn with_poster_link(mut self, link: impl Into<String>) -> Self {
        self.poster_link = link.into();
        self
    }

    /// Non-empty star names joined with ", ".
    pub fn cast(&self) -> String {
        self.stars
            .iter()
            .filter(|s| !s.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The text vectorized for similarity: genre, director, the four stars
    /// and the overview, joined by single spaces in that order.
    pub fn composite_document(&self) -> String {
        let [s1, s2, s3, s4] = &self.stars;
        [
            self.genre.as_str(),
            self.director.as_str(),
            s1,
            s2,
            s3,
            s4,
            self.overview.as_str(),
        ]
        .join(" ")
    }
}
