use anyhow::{Context, Result};
use cinematch_enrich::{Config, Recommendation, Recommender};
use serde_json::json;

use super::{build_recommender, load_index};

/// Titles suggested when the query is not in the catalog.
const MAX_SUGGESTIONS: usize = 5;

/// Outcome of a recommendation query.
#[derive(Debug)]
enum Lookup {
    Found {
        /// The query title as spelled in the catalog.
        query: String,
        recommendations: Vec<Recommendation>,
    },
    NotFound {
        suggestions: Vec<String>,
    },
}

async fn lookup(recommender: &Recommender, title: &str, k: usize) -> Lookup {
    let recommendations = recommender.recommend(title, k).await;
    let catalog = recommender.index().catalog();

    // Unknown titles come back empty. A known title can be empty too
    // (k = 0 or a catalog of one), so the title index decides.
    if recommendations.is_empty() && catalog.position_of(title).is_none() {
        return Lookup::NotFound {
            suggestions: catalog
                .search_titles(title)
                .into_iter()
                .take(MAX_SUGGESTIONS)
                .map(|(_, entry)| entry.title.clone())
                .collect(),
        };
    }

    let query = catalog
        .position_of(title)
        .and_then(|position| catalog.get(position))
        .map_or_else(|| title.to_string(), |entry| entry.title.clone());
    Lookup::Found {
        query,
        recommendations,
    }
}

pub async fn run_recommend(
    config: &Config,
    title: &str,
    k: usize,
    offline: bool,
    as_json: bool,
) -> Result<()> {
    let index = load_index(config)?;
    let recommender = build_recommender(config, index, offline)?;

    log::info!(
        "Recommending {} titles for {:?} ({})",
        k,
        title,
        recommender.provider_name().unwrap_or("offline")
    );

    let (query, recommendations) = match lookup(&recommender, title, k).await {
        Lookup::Found {
            query,
            recommendations,
        } => (query, recommendations),
        Lookup::NotFound { suggestions } => return print_not_found(title, &suggestions, as_json),
    };

    if as_json {
        let output = json!({
            "query": query,
            "found": true,
            "recommendations": recommendations,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialize recommendations")?
        );
        return Ok(());
    }

    println!("\n🎬 Movies similar to {}\n", query);

    if recommendations.is_empty() {
        println!("  No recommendations.");
        return Ok(());
    }

    for recommendation in &recommendations {
        print_recommendation(recommendation);
    }

    if recommender.is_offline() {
        println!("(catalog data only; set omdb_api_key for OMDb details)");
    }

    Ok(())
}

fn print_not_found(title: &str, suggestions: &[String], as_json: bool) -> Result<()> {
    if as_json {
        let output = json!({
            "query": title,
            "found": false,
            "suggestions": suggestions,
            "recommendations": [],
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("No movie titled {:?} in the catalog.", title);
    if !suggestions.is_empty() {
        println!("\nDid you mean:");
        for suggestion in suggestions {
            println!("  {}", suggestion);
        }
    }
    Ok(())
}

fn print_recommendation(rec: &Recommendation) {
    let e = &rec.enrichment;
    println!("{}. {}  [similarity {:.3}]", rec.rank, rec.title, rec.score);
    println!("   Year:       {}", e.year_or_placeholder());
    if !rec.genre.is_empty() {
        println!("   Genre:      {}", rec.genre);
    }
    if !rec.rating.is_empty() {
        println!("   IMDb:       {}", rec.rating);
    }
    println!("   Director:   {}", e.director_or_placeholder());
    println!("   Actors:     {}", e.actors_or_placeholder());
    println!("   Box office: {}", e.box_office_or_placeholder());
    println!("   Poster:     {}", e.poster_or_placeholder());
    println!("   Plot:       {}", e.plot_or_placeholder());
    println!();
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cinematch_core::{Catalog, CatalogEntry};
    use cinematch_search::SimilarityIndex;

    use super::*;

    fn recommender(entries: Vec<CatalogEntry>) -> Recommender {
        let index = SimilarityIndex::build(Arc::new(Catalog::new(entries))).unwrap();
        Recommender::new(Arc::new(index))
    }

    fn heist_catalog() -> Vec<CatalogEntry> {
        vec![
            CatalogEntry::new("Heat").with_overview("a crew of thieves plans a bank heist"),
            CatalogEntry::new("Ronin").with_overview("thieves chase a briefcase heist"),
            CatalogEntry::new("Up").with_overview("an old man flies his house with balloons"),
        ]
    }

    #[tokio::test]
    async fn test_lookup_uses_catalog_spelling() {
        let recommender = recommender(heist_catalog());

        let Lookup::Found {
            query,
            recommendations,
        } = lookup(&recommender, "heat", 2).await
        else {
            panic!("heat should be found");
        };
        assert_eq!(query, "Heat");
        assert_eq!(recommendations.len(), 2);
        assert_eq!(recommendations[0].title, "Ronin");
    }

    #[tokio::test]
    async fn test_lookup_unknown_title_suggests_matches() {
        let recommender = recommender(heist_catalog());

        let Lookup::NotFound { suggestions } = lookup(&recommender, "Hea", 3).await else {
            panic!("Hea is not a catalog title");
        };
        assert_eq!(suggestions, vec!["Heat".to_string()]);
    }

    #[tokio::test]
    async fn test_lookup_known_title_without_neighbors_is_found() {
        let recommender = recommender(vec![CatalogEntry::new("Solo").with_genre("Drama")]);

        let Lookup::Found {
            query,
            recommendations,
        } = lookup(&recommender, "Solo", 5).await
        else {
            panic!("a single-entry catalog still knows its title");
        };
        assert_eq!(query, "Solo");
        assert!(recommendations.is_empty());

        let Lookup::Found { recommendations, .. } = lookup(&recommender, "solo", 0).await else {
            panic!("k = 0 is not a miss");
        };
        assert!(recommendations.is_empty());
    }
}
