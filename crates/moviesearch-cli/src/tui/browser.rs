//! Movie browser TUI main loop.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use moviesearch_api::omdb::{OmdbApi, imdb_title_url};
use moviesearch_session::Session;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use super::state::{Action, BrowserState};
use super::ui;

/// Pause between input polls; spawned fetches run while the loop sleeps.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs the movie browser TUI until the user quits.
///
/// With `query`, a search is started before the first frame.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub async fn run_browser<A>(session: Arc<Session<A>>, query: Option<&str>) -> Result<()>
where
    A: OmdbApi + Sync + 'static,
{
    let mut browser = BrowserState::new(query);
    if let Some(q) = query {
        dispatch(&session, Action::Search(String::from(q)));
    }

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut browser, &session).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
async fn run_event_loop<A>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    browser: &mut BrowserState,
    session: &Arc<Session<A>>,
) -> Result<()>
where
    A: OmdbApi + Sync + 'static,
{
    let mut main_area_height: u16 = 0;

    loop {
        let snapshot = session.snapshot();
        terminal
            .draw(|frame| {
                main_area_height = ui::draw(frame, browser, &snapshot);
            })
            .context("failed to draw TUI")?;

        let page_size = usize::from(main_area_height.saturating_sub(4));

        if event::poll(Duration::ZERO).context("failed to poll events")?
            && let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
        {
            match browser.handle_key(&snapshot, key.code, key.modifiers, page_size) {
                Action::Quit => return Ok(()),
                action => dispatch(session, action),
            }
        } else {
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

/// Hands an action to the session; fetches run as background tasks.
fn dispatch<A>(session: &Arc<Session<A>>, action: Action)
where
    A: OmdbApi + Sync + 'static,
{
    match action {
        Action::None | Action::Quit => {}
        Action::Search(query) => {
            let session = Arc::clone(session);
            tokio::spawn(async move { session.search(&query).await });
        }
        Action::Select(imdb_id) => {
            let session = Arc::clone(session);
            tokio::spawn(async move { session.select(&imdb_id).await });
        }
        Action::NextPage => {
            let session = Arc::clone(session);
            tokio::spawn(async move { session.next_page().await });
        }
        Action::PrevPage => {
            let session = Arc::clone(session);
            tokio::spawn(async move { session.prev_page().await });
        }
        Action::Back => session.back(),
        Action::ToggleSort => session.toggle_sort(),
        Action::SetGenre(filter) => session.set_genre_filter(filter),
        Action::Open(imdb_id) => {
            let url = imdb_title_url(&imdb_id);
            if let Err(e) = open::that(&url) {
                tracing::debug!(%url, error = %e, "Failed to open browser");
            }
        }
    }
}
