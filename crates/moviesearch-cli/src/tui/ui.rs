//! TUI rendering logic for the movie browser.

use moviesearch_api::omdb::{MovieDetail, NOT_AVAILABLE};
use moviesearch_session::SessionState;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, Wrap};

use super::state::{BrowserState, InputMode};

/// Draws the browser UI. Returns the main content area height for page size calculation.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, browser: &mut BrowserState, session: &SessionState) -> u16 {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(5),    // main content
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], browser, session);

    match session.detail() {
        Some(detail) => draw_detail(frame, chunks[1], detail),
        None => draw_result_list(frame, chunks[1], browser, session),
    }

    draw_footer(frame, chunks[2], browser, session);

    chunks[1].height
}

/// Draws the header with the search input and list status.
#[allow(clippy::indexing_slicing)]
fn draw_header(frame: &mut Frame, area: Rect, browser: &BrowserState, session: &SessionState) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let input_style = if browser.input_mode == InputMode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let input = Paragraph::new(browser.input.as_str())
        .style(input_style)
        .block(Block::default().borders(Borders::ALL).title(" Search: / "));
    frame.render_widget(input, header_chunks[0]);

    let mut spans = vec![Span::raw(format!(
        "Sort: {}  Genre: {}  Page {}/{}  ({} results)",
        session.sort_order.label(),
        session.genre_filter,
        session.page,
        session.total_pages(),
        session.total_results,
    ))];
    if session.is_loading() {
        spans.push(Span::styled(
            "  Loading...",
            Style::default().fg(Color::Yellow),
        ));
    }
    let status = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Movies "));
    frame.render_widget(status, header_chunks[1]);
}

/// Draws the filtered and sorted result list.
fn draw_result_list(
    frame: &mut Frame,
    area: Rect,
    browser: &mut BrowserState,
    session: &SessionState,
) {
    let header = Row::new(vec!["Year", "Title", "Type", "IMDb ID", "Genre", "Poster"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let visible = session.visible_results();
    browser.clamp(visible.len());

    let rows: Vec<Row> = visible
        .iter()
        .map(|r| {
            Row::new(vec![
                r.year.clone(),
                r.title.clone(),
                r.kind.clone().unwrap_or_default(),
                r.imdb_id.clone(),
                String::from(session.genre_index.genre_of(&r.imdb_id).unwrap_or("--")),
                String::from(r.poster_url()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(10), // Year
        Constraint::Min(24),    // Title
        Constraint::Length(8),  // Type
        Constraint::Length(11), // IMDb ID
        Constraint::Length(24), // Genre
        Constraint::Min(20),    // Poster
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(" Results "))
        .row_highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, area, &mut browser.table_state);
}

/// Formats one labelled detail line; absent values render as `N/A`.
fn field<'a>(label: &'a str, value: Option<&'a str>) -> Line<'a> {
    Line::from(vec![
        Span::styled(
            format!("{label:<10}"),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(value.unwrap_or(NOT_AVAILABLE)),
    ])
}

/// Draws the detail view of one movie.
fn draw_detail(frame: &mut Frame, area: Rect, detail: &MovieDetail) {
    let lines = vec![
        field("Year", Some(detail.year.as_str())),
        field("Rated", detail.rated.as_deref()),
        field("Released", detail.released.as_deref()),
        field("Runtime", detail.runtime.as_deref()),
        field("Genre", detail.genre.as_deref()),
        field("Director", detail.director.as_deref()),
        field("Actors", detail.actors.as_deref()),
        field("Language", detail.language.as_deref()),
        field("Country", detail.country.as_deref()),
        field("Rating", detail.imdb_rating.as_deref()),
        field("Poster", Some(detail.poster_url())),
        Line::from(""),
        Line::from(detail.plot.as_deref().unwrap_or(NOT_AVAILABLE)),
    ];

    let title = format!(" {} ({}) ", detail.title, detail.imdb_id);
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    frame.render_widget(paragraph, area);
}

/// Draws the footer with the last error or key hints.
fn draw_footer(frame: &mut Frame, area: Rect, browser: &BrowserState, session: &SessionState) {
    let line = if let Some(error) = &session.error {
        Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        ))
    } else if session.detail().is_some() {
        Line::from("Esc/b: back  o: open IMDb  q: quit")
    } else if browser.input_mode == InputMode::Search {
        Line::from("Type a title | Esc: cancel | Enter: search")
    } else {
        Line::from(vec![Span::raw(
            "\u{2191}\u{2193}/j/k: move  Enter: details  /: search  s: sort  g/G: genre  n/p: page  o: open  q: quit",
        )])
    };

    let footer = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
