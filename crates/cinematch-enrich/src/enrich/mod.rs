//! Per-title enrichment data and the provider boundary.
//!
//! An [`Enrichment`] is decided field by field: each value is either
//! [`Field::Available`] or [`Field::Unavailable`], and unavailable fields
//! render as fixed placeholders. Providers never fail as a whole.

pub mod omdb;
pub mod resilience;

use async_trait::async_trait;
use serde::{Serialize, Serializer};

use cinematch_core::CatalogEntry;

pub const POSTER_PLACEHOLDER: &str = "https://via.placeholder.com/150";
pub const PLOT_PLACEHOLDER: &str = "Description not available";
pub const VALUE_PLACEHOLDER: &str = "N/A";

/// A single enrichment value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    Available(T),
    Unavailable,
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Self::Unavailable
    }
}

impl<T> Field<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// This field if available, otherwise `fallback`.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        match self {
            Self::Available(_) => self,
            Self::Unavailable => fallback,
        }
    }
}

impl Field<String> {
    /// `Available` for a non-empty value, treating OMDb's `"N/A"` marker as
    /// missing.
    pub fn from_text(value: impl Into<String>) -> Self {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == VALUE_PLACEHOLDER {
            Self::Unavailable
        } else if trimmed.len() == value.len() {
            Self::Available(value)
        } else {
            Self::Available(trimmed.to_string())
        }
    }

    pub fn display_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        match self {
            Self::Available(value) => value,
            Self::Unavailable => placeholder,
        }
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Available(value) => serializer.serialize_some(value),
            Self::Unavailable => serializer.serialize_none(),
        }
    }
}

/// Presentation data for one recommended title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Enrichment {
    pub poster: Field<String>,
    pub plot: Field<String>,
    pub year: Field<String>,
    pub actors: Field<String>,
    pub director: Field<String>,
    pub box_office: Field<String>,
}

impl Enrichment {
    /// Every field unavailable.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Offline enrichment built from the catalog row itself.
    pub fn from_catalog(entry: &CatalogEntry) -> Self {
        Self {
            poster: Field::from_text(entry.poster_link.as_str()),
            plot: Field::from_text(entry.overview.as_str()),
            year: Field::from_text(entry.released_year.as_str()),
            actors: Field::from_text(entry.cast()),
            director: Field::from_text(entry.director.as_str()),
            box_office: Field::from_text(entry.gross.as_str()),
        }
    }

    /// Fill every unavailable field from `fallback`.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            poster: self.poster.or(fallback.poster),
            plot: self.plot.or(fallback.plot),
            year: self.year.or(fallback.year),
            actors: self.actors.or(fallback.actors),
            director: self.director.or(fallback.director),
            box_office: self.box_office.or(fallback.box_office),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::unavailable()
    }

    pub fn poster_or_placeholder(&self) -> &str {
        self.poster.display_or(POSTER_PLACEHOLDER)
    }

    pub fn plot_or_placeholder(&self) -> &str {
        self.plot.display_or(PLOT_PLACEHOLDER)
    }

    pub fn year_or_placeholder(&self) -> &str {
        self.year.display_or(VALUE_PLACEHOLDER)
    }

    pub fn actors_or_placeholder(&self) -> &str {
        self.actors.display_or(VALUE_PLACEHOLDER)
    }

    pub fn director_or_placeholder(&self) -> &str {
        self.director.display_or(VALUE_PLACEHOLDER)
    }

    pub fn box_office_or_placeholder(&self) -> &str {
        self.box_office.display_or(VALUE_PLACEHOLDER)
    }
}

/// A source of enrichment data for a title the core has already selected.
///
/// Implementations must not fail: anything that goes wrong is reported as
/// unavailable fields.
#[async_trait]
pub trait EnrichmentProvider: Send + Sync + std::fmt::Debug {
    /// Short source name for logs and status output.
    fn name(&self) -> &str;

    async fn enrich(&self, title: &str) -> Enrichment;
}
