use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};

use cinematch_enrich::Recommendation;

use super::App;

/// Render the ranked recommendations for the movie at `position`.
pub fn render(frame: &mut Frame, app: &App, position: usize) {
    let area = frame.area();

    let Some(movie) = app.movies().get(position) else {
        let msg = Paragraph::new("Movie not found").style(Style::default().fg(Color::Red));
        frame.render_widget(msg, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Query header
            Constraint::Min(8),    // Ranked list + detail
            Constraint::Length(3), // Help bar
        ])
        .split(area);

    let header = Paragraph::new(format!("Because you picked: {}", movie.title))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);

    render_ranking(frame, app, body[0]);
    render_detail(frame, app.selected_recommendation(), body[1]);
    render_help(frame, chunks[2]);
}

fn render_ranking(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec![
        Cell::from("#").style(Style::default().fg(Color::DarkGray)),
        Cell::from("Title").style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from("Score"),
    ])
    .height(1);

    let rows: Vec<Row> = app
        .recommendations
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let style = if i == app.selected_recommendation {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(format!("{}", rec.rank)),
                Cell::from(rec.title.clone()),
                Cell::from(format!("{:.3}", rec.score)),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title("Recommendations"));

    frame.render_widget(table, area);
}

fn render_detail(frame: &mut Frame, rec: Option<&Recommendation>, area: Rect) {
    let lines: Vec<Line<'_>> = match rec {
        Some(rec) => {
            let e = &rec.enrichment;
            vec![
                Line::from(Span::styled(
                    rec.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                detail_line("Year", e.year_or_placeholder()),
                detail_line("Director", e.director_or_placeholder()),
                detail_line("Actors", e.actors_or_placeholder()),
                detail_line("Box office", e.box_office_or_placeholder()),
                detail_line("Poster", e.poster_or_placeholder()),
                Line::from(""),
                Line::from(e.plot_or_placeholder().to_string()),
            ]
        }
        None => vec![Line::from(Span::styled(
            "  No recommendations.",
            Style::default().fg(Color::Yellow),
        ))],
    };

    let detail = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Details"));
    frame.render_widget(detail, area);
}

fn detail_line(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<11}", label), Style::default().fg(Color::Cyan)),
        Span::raw(value.to_string()),
    ])
}

fn render_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new("  \u{2191}/k Prev  \u{2193}/j Next  Enter Follow  b Back  q Quit")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, area);
}
