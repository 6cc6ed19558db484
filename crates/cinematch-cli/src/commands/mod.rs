pub mod browse;
pub mod config;
pub mod recommend;
pub mod status;
pub mod titles;

use std::sync::Arc;

use anyhow::{Context, Result};
use cinematch_core::{load_catalog_file, Catalog};
use cinematch_enrich::{Config, Recommender};
use cinematch_search::SimilarityIndex;

pub use browse::run_browse;
pub use recommend::run_recommend;
pub use status::show_status;
pub use titles::list_titles;

/// Load the configured catalog, failing with the path in the message.
pub fn load_catalog(config: &Config) -> Result<Arc<Catalog>> {
    let catalog = load_catalog_file(&config.catalog_path).with_context(|| {
        format!(
            "Failed to load catalog from {}\n\nPass --catalog or set catalog_path (see 'cinematch config example').",
            config.catalog_path.display()
        )
    })?;
    Ok(Arc::new(catalog))
}

/// Load the catalog and build the similarity index over it.
pub fn load_index(config: &Config) -> Result<Arc<SimilarityIndex>> {
    let catalog = load_catalog(config)?;
    let index = SimilarityIndex::build(catalog).context("Failed to build similarity index")?;
    log::info!(
        "Indexed {} movies over {} terms",
        index.len(),
        index.vocabulary_size()
    );
    Ok(Arc::new(index))
}

/// A recommender over `index`, enriched from OMDb unless offline or no key
/// is configured.
pub fn build_recommender(
    config: &Config,
    index: Arc<SimilarityIndex>,
    offline: bool,
) -> Result<Recommender> {
    let recommender = Recommender::new(index);
    if offline {
        return Ok(recommender);
    }

    match config
        .omdb_enricher()
        .context("Failed to create OMDb client")?
    {
        Some(enricher) => Ok(recommender.with_provider(Arc::new(enricher))),
        None => {
            log::debug!("No OMDb API key configured; using catalog data only");
            Ok(recommender)
        }
    }
}
