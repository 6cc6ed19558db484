use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use super::App;

/// Render the catalog list view.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(5),    // Movie table
            Constraint::Length(3), // Help bar
        ])
        .split(area);

    render_title(frame, app, chunks[0]);
    render_table(frame, app, chunks[1]);
    render_help(frame, chunks[2]);
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let source = app.recommender.provider_name().unwrap_or("catalog only");
    let title = Paragraph::new(format!(
        "Cinematch    {} movies    enrichment: {}",
        app.movies().len(),
        source
    ))
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec![
        Cell::from("#").style(Style::default().fg(Color::DarkGray)),
        Cell::from("Title").style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from("Year"),
        Cell::from("Genre"),
        Cell::from("IMDb"),
    ])
    .height(1);

    // area.height - 2 for borders - 1 for header
    let viewport_height = (area.height.saturating_sub(3)) as usize;
    app.viewport_height.set(viewport_height);
    let movies = app.movies();
    let visible_start = app.list_offset;
    let visible_end = (visible_start + viewport_height).min(movies.len());

    let rows: Vec<Row> = movies
        .iter()
        .enumerate()
        .skip(visible_start)
        .take(viewport_height)
        .map(|(i, movie)| {
            let style = if i == app.selected_movie {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(movie.title.clone()),
                Cell::from(movie.released_year.clone()),
                Cell::from(movie.genre.clone()),
                Cell::from(if movie.rating.is_empty() {
                    "-".to_string()
                } else {
                    movie.rating.clone()
                }),
            ])
            .style(style)
        })
        .collect();

    let title = if movies.len() > viewport_height {
        format!(
            "Movies [{}-{} of {}]",
            visible_start + 1,
            visible_end,
            movies.len()
        )
    } else {
        "Movies".to_string()
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Percentage(45),
            Constraint::Length(6),
            Constraint::Percentage(30),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(table, area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new("  \u{2191}/k Up  \u{2193}/j Down  Enter Recommend  q Quit")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, area);
}
