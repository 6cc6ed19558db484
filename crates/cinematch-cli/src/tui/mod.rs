use std::cell::Cell;
use std::io;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use tokio::runtime::Handle;

use cinematch_core::CatalogEntry;
use cinematch_enrich::{Recommendation, Recommender};

pub mod movie_list;
pub mod recommendations;

/// Movie rows visible until the list has been rendered once.
const DEFAULT_VIEWPORT_HEIGHT: usize = 20;

/// Which view the TUI is currently displaying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    MovieList,
    /// Recommendations for the catalog entry at the given position.
    Recommendations(usize),
}

/// Application state for the catalog browser.
#[derive(Debug)]
pub struct App {
    pub view: View,
    pub recommender: Recommender,
    pub count: usize,
    pub selected_movie: usize,
    pub list_offset: usize, // First visible movie in the list
    pub recommendations: Vec<Recommendation>,
    pub selected_recommendation: usize,
    pub should_quit: bool,
    /// Movie rows shown by the last render of the list.
    pub viewport_height: Cell<usize>,
    runtime: Handle,
}

impl App {
    /// Create a new `App`. Enrichment futures are driven on `runtime`.
    pub fn new(recommender: Recommender, count: usize, runtime: Handle) -> Self {
        Self {
            view: View::MovieList,
            recommender,
            count,
            selected_movie: 0,
            list_offset: 0,
            recommendations: Vec::new(),
            selected_recommendation: 0,
            should_quit: false,
            viewport_height: Cell::new(DEFAULT_VIEWPORT_HEIGHT),
            runtime,
        }
    }

    pub fn movies(&self) -> &[CatalogEntry] {
        self.recommender.index().catalog().entries()
    }

    pub fn selected_recommendation(&self) -> Option<&Recommendation> {
        self.recommendations.get(self.selected_recommendation)
    }

    fn handle_key(&mut self, key: KeyCode) {
        match self.view {
            View::MovieList => self.handle_movie_list_key(key),
            View::Recommendations(_) => self.handle_recommendations_key(key),
        }
    }

    fn handle_movie_list_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected_movie + 1 < self.movies().len() {
                    self.selected_movie += 1;
                    // Scroll down if selection goes below visible area
                    let visible = self.viewport_height.get().max(1);
                    if self.selected_movie >= self.list_offset + visible {
                        self.list_offset = self.selected_movie + 1 - visible;
                    }
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if self.selected_movie > 0 {
                    self.selected_movie -= 1;
                    // Scroll up if selection goes above visible area
                    if self.selected_movie < self.list_offset {
                        self.list_offset = self.selected_movie;
                    }
                }
            }
            KeyCode::Enter => {
                if !self.movies().is_empty() {
                    self.open_recommendations(self.selected_movie);
                }
            }
            _ => {}
        }
    }

    fn handle_recommendations_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Char('b') => {
                self.view = View::MovieList;
            }
            KeyCode::Char('n' | 'j') | KeyCode::Down => {
                if self.selected_recommendation + 1 < self.recommendations.len() {
                    self.selected_recommendation += 1;
                }
            }
            KeyCode::Char('p' | 'k') | KeyCode::Up => {
                if self.selected_recommendation > 0 {
                    self.selected_recommendation -= 1;
                }
            }
            // Follow the highlighted recommendation to its own neighbors.
            KeyCode::Enter => {
                if let Some(position) = self.selected_recommendation().map(|r| r.position) {
                    self.selected_movie = position;
                    self.list_offset = position.saturating_sub(self.viewport_height.get() / 2);
                    self.open_recommendations(position);
                }
            }
            _ => {}
        }
    }

    fn open_recommendations(&mut self, position: usize) {
        log::debug!("Loading recommendations for catalog position {}", position);
        self.recommendations = self
            .runtime
            .block_on(self.recommender.recommend_position(position, self.count));
        self.selected_recommendation = 0;
        self.view = View::Recommendations(position);
    }
}

/// Run the catalog browser.
///
/// Sets up the terminal, runs the main event loop, and restores the terminal
/// on exit (including on error). Must not be called from inside an async
/// task: enrichment is driven with [`Handle::block_on`].
pub fn run_tui(app: App) -> Result<()> {
    if app.movies().is_empty() {
        println!("The catalog is empty.");
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the event loop, capturing any error so we can restore the terminal
    let result = run_event_loop(&mut terminal, app);

    // Restore terminal regardless of success or failure
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
) -> Result<()> {
    loop {
        terminal.draw(|frame| match app.view {
            View::MovieList => movie_list::render(frame, &app),
            View::Recommendations(position) => recommendations::render(frame, &app, position),
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key.code);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cinematch_core::Catalog;
    use cinematch_search::SimilarityIndex;
    use tokio::runtime::Runtime;

    use super::*;

    fn app(runtime: &Runtime, size: usize) -> App {
        let catalog: Catalog = (0..size)
            .map(|i| {
                CatalogEntry::new(format!("Movie {i}"))
                    .with_genre(if i % 2 == 0 { "Drama" } else { "Comedy" })
                    .with_overview(format!("story number {i} about heists"))
            })
            .collect();
        let index = SimilarityIndex::build(Arc::new(catalog)).unwrap();
        App::new(
            Recommender::new(Arc::new(index)),
            3,
            runtime.handle().clone(),
        )
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let runtime = Runtime::new().unwrap();
        let mut app = app(&runtime, 3);

        app.handle_key(KeyCode::Up);
        assert_eq!(app.selected_movie, 0);
        for _ in 0..10 {
            app.handle_key(KeyCode::Down);
        }
        assert_eq!(app.selected_movie, 2);
    }

    #[test]
    fn test_list_scrolls_with_selection() {
        let runtime = Runtime::new().unwrap();
        let mut app = app(&runtime, 30);

        for _ in 0..25 {
            app.handle_key(KeyCode::Char('j'));
        }
        assert_eq!(app.selected_movie, 25);
        assert_eq!(app.list_offset, 25 - DEFAULT_VIEWPORT_HEIGHT + 1);

        for _ in 0..25 {
            app.handle_key(KeyCode::Char('k'));
        }
        assert_eq!(app.selected_movie, 0);
        assert_eq!(app.list_offset, 0);
    }

    #[test]
    fn test_selection_stays_visible_on_small_terminal() {
        use ratatui::backend::TestBackend;

        let runtime = Runtime::new().unwrap();
        let mut app = app(&runtime, 40);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        for _ in 0..18 {
            terminal.draw(|frame| movie_list::render(frame, &app)).unwrap();
            app.handle_key(KeyCode::Down);
        }

        // 24 rows minus title and help bars, table borders and header.
        let visible = app.viewport_height.get();
        assert_eq!(visible, 15);
        assert_eq!(app.selected_movie, 18);
        assert!(app.selected_movie >= app.list_offset);
        assert!(app.selected_movie < app.list_offset + visible);
        assert_eq!(app.list_offset, 18 + 1 - visible);
    }

    #[test]
    fn test_enter_loads_recommendations_without_query() {
        let runtime = Runtime::new().unwrap();
        let mut app = app(&runtime, 5);

        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.view, View::Recommendations(1));
        assert_eq!(app.recommendations.len(), 3);
        assert!(app.recommendations.iter().all(|r| r.position != 1));

        app.handle_key(KeyCode::Char('b'));
        assert_eq!(app.view, View::MovieList);
    }

    #[test]
    fn test_enter_on_recommendation_follows_it() {
        let runtime = Runtime::new().unwrap();
        let mut app = app(&runtime, 5);

        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::Down);
        let target = app.selected_recommendation().unwrap().position;

        app.handle_key(KeyCode::Enter);
        assert_eq!(app.view, View::Recommendations(target));
        assert_eq!(app.selected_movie, target);
        assert_eq!(app.selected_recommendation, 0);
    }

    #[test]
    fn test_quit_keys() {
        let runtime = Runtime::new().unwrap();
        let mut app = app(&runtime, 2);
        app.handle_key(KeyCode::Esc);
        assert!(app.should_quit);
    }
}
