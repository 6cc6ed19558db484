use anyhow::Result;
use cinematch_enrich::Config;

use super::load_index;

pub fn show_status(config: &Config) -> Result<()> {
    println!("\n📊 Cinematch Status\n");
    println!("  Catalog: {}", config.catalog_path.display());

    if !config.catalog_path.exists() {
        println!("  Catalog file not found.");
        println!("\n  Download the IMDb top-1000 CSV and pass --catalog, or set catalog_path.");
        return Ok(());
    }

    let index = load_index(config)?;
    println!("  Movies: {}", index.len());
    println!("  Vocabulary: {} terms", index.vocabulary_size());

    let duplicates = index.catalog().duplicate_titles();
    if !duplicates.is_empty() {
        println!(
            "  Duplicate titles ({}; lookups use the first): {}",
            duplicates.len(),
            duplicates.join(", ")
        );
    }

    if config.has_omdb() {
        println!("  Enrichment: OMDb ({})", config.omdb_base_url);
    } else {
        println!("  Enrichment: catalog data only");
        println!("\n  Run `cinematch config set omdb_api_key <key>` to enable OMDb");
    }

    Ok(())
}
