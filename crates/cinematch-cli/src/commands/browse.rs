use anyhow::Result;
use cinematch_enrich::Config;
use tokio::runtime::Handle;

use super::{build_recommender, load_index};
use crate::tui::{self, App};

/// Open the interactive catalog browser.
///
/// The terminal loop blocks on keyboard input, so it runs inside
/// `block_in_place` and drives enrichment through the current runtime handle.
pub fn run_browse(config: &Config, offline: bool) -> Result<()> {
    let index = load_index(config)?;
    let recommender = build_recommender(config, index, offline)?;
    let app = App::new(recommender, config.recommendations, Handle::current());

    tokio::task::block_in_place(|| tui::run_tui(app))
}
