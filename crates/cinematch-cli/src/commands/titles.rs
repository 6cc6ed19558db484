use anyhow::Result;
use cinematch_enrich::Config;

use super::load_catalog;

pub fn list_titles(config: &Config, filter: Option<&str>) -> Result<()> {
    let catalog = load_catalog(config)?;

    let matches = catalog.search_titles(filter.unwrap_or(""));
    if matches.is_empty() {
        println!("No titles match {:?}.", filter.unwrap_or(""));
        return Ok(());
    }

    for (_, entry) in &matches {
        if entry.released_year.is_empty() {
            println!("{}", entry.title);
        } else {
            println!("{} ({})", entry.title, entry.released_year);
        }
    }

    if filter.is_some() {
        println!("\n{} of {} titles", matches.len(), catalog.len());
    }

    Ok(())
}
