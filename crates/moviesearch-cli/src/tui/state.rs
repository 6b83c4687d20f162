//! Browser TUI state management.
//!
//! Holds only what the terminal needs on top of the session state:
//! the input line, the cursor and the pending command.

use std::collections::BTreeSet;

use crossterm::event::{KeyCode, KeyModifiers};
use moviesearch_session::{GenreFilter, SessionState};
use ratatui::widgets::TableState;

/// Input mode for the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode.
    Normal,
    /// Query text input mode.
    Search,
}

/// What a key press asks the session to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Nothing beyond local state changes.
    None,
    /// Leave the browser.
    Quit,
    /// Run a new search.
    Search(String),
    /// Open the detail view of a result.
    Select(String),
    /// Return to the list view.
    Back,
    /// Flip the sort direction.
    ToggleSort,
    /// Replace the genre filter.
    SetGenre(GenreFilter),
    /// Fetch the next result page.
    NextPage,
    /// Fetch the previous result page.
    PrevPage,
    /// Open a title in the system browser.
    Open(String),
}

/// State for the browser TUI.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserState {
    /// Current input mode.
    pub input_mode: InputMode,
    /// Query being typed.
    pub input: String,
    /// Table state for the result list (handles selection and scroll).
    pub table_state: TableState,
}

impl BrowserState {
    /// Creates a new state, pre-filling the input with `query`.
    #[must_use]
    pub fn new(query: Option<&str>) -> Self {
        Self {
            input_mode: InputMode::Normal,
            input: query.map(String::from).unwrap_or_default(),
            table_state: TableState::default(),
        }
    }

    /// Returns the cursor position.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    /// Keeps the cursor inside a list of `len` rows.
    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.table_state.select(None);
        } else {
            let max = len.saturating_sub(1);
            self.table_state.select(Some(self.cursor().min(max)));
        }
    }

    /// Moves cursor up.
    pub fn move_up(&mut self) {
        let current = self.cursor();
        if current > 0 {
            self.table_state.select(Some(current.saturating_sub(1)));
        }
    }

    /// Moves cursor down within `len` rows.
    pub fn move_down(&mut self, len: usize) {
        let next = self.cursor().saturating_add(1);
        if next < len {
            self.table_state.select(Some(next));
        }
    }

    /// Scrolls up by a page.
    pub fn page_up(&mut self, page_size: usize) {
        let current = self.cursor();
        self.table_state
            .select(Some(current.saturating_sub(page_size)));
    }

    /// Scrolls down by a page within `len` rows.
    pub fn page_down(&mut self, page_size: usize, len: usize) {
        let max = len.saturating_sub(1);
        let current = self.cursor();
        self.table_state
            .select(Some(current.saturating_add(page_size).min(max)));
    }

    /// Handles a key press against the current session state.
    pub fn handle_key(
        &mut self,
        session: &SessionState,
        key: KeyCode,
        modifiers: KeyModifiers,
        page_size: usize,
    ) -> Action {
        if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }
        if let Some(detail) = session.detail() {
            return match key {
                KeyCode::Char('q') => Action::Quit,
                KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace => Action::Back,
                KeyCode::Char('o') => Action::Open(detail.imdb_id.clone()),
                _ => Action::None,
            };
        }
        match self.input_mode {
            InputMode::Search => self.handle_search_input(key),
            InputMode::Normal => self.handle_normal_input(session, key, page_size),
        }
    }

    /// Handles key input in search mode.
    fn handle_search_input(&mut self, key: KeyCode) -> Action {
        match key {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                self.table_state.select(Some(0));
                return Action::Search(self.input.clone());
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => {
                self.input.push(c);
            }
            _ => {}
        }
        Action::None
    }

    /// Handles key input in normal mode.
    fn handle_normal_input(
        &mut self,
        session: &SessionState,
        key: KeyCode,
        page_size: usize,
    ) -> Action {
        let visible = session.visible_results();
        let len = visible.len();
        let selected_id = visible.get(self.cursor()).map(|r| r.imdb_id.clone());

        match key {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Search;
                Action::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_up();
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_down(len);
                Action::None
            }
            KeyCode::PageUp => {
                self.page_up(page_size);
                Action::None
            }
            KeyCode::PageDown => {
                self.page_down(page_size, len);
                Action::None
            }
            KeyCode::Char('s') => Action::ToggleSort,
            KeyCode::Char('g') => {
                Action::SetGenre(cycle_genre(session.genres(), &session.genre_filter, true))
            }
            KeyCode::Char('G') => {
                Action::SetGenre(cycle_genre(session.genres(), &session.genre_filter, false))
            }
            KeyCode::Char('n') => {
                self.table_state.select(Some(0));
                Action::NextPage
            }
            KeyCode::Char('p') => {
                self.table_state.select(Some(0));
                Action::PrevPage
            }
            KeyCode::Enter => selected_id.map_or(Action::None, Action::Select),
            KeyCode::Char('o') => selected_id.map_or(Action::None, Action::Open),
            _ => Action::None,
        }
    }
}

/// Steps through `all` followed by each genre, wrapping at either end.
///
/// A filter that is no longer among `genres` restarts from `all`.
#[must_use]
pub fn cycle_genre(genres: &BTreeSet<String>, current: &GenreFilter, forward: bool) -> GenreFilter {
    let options: Vec<GenreFilter> = std::iter::once(GenreFilter::All)
        .chain(genres.iter().cloned().map(GenreFilter::Genre))
        .collect();
    let count = options.len();
    let position = options.iter().position(|o| o == current).unwrap_or(0);
    let next = if forward {
        position.saturating_add(1).checked_rem(count).unwrap_or(0)
    } else {
        position.checked_sub(1).unwrap_or(count.saturating_sub(1))
    };
    options.get(next).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use moviesearch_api::omdb::{MovieDetail, ResultSummary};
    use moviesearch_session::{GenreIndex, ViewState};

    use super::*;

    fn summary(id: &str, year: &str) -> ResultSummary {
        ResultSummary {
            imdb_id: String::from(id),
            title: format!("Title {id}"),
            year: String::from(year),
            poster: String::from("N/A"),
            kind: Some(String::from("movie")),
        }
    }

    fn session_with_results() -> SessionState {
        let mut index = GenreIndex::default();
        index.insert(
            "tt1",
            &MovieDetail {
                genre: Some(String::from("Action, Crime")),
                ..MovieDetail::default()
            },
        );
        let mut session = SessionState::default();
        session.results = vec![summary("tt1", "2005"), summary("tt2", "1989")];
        session.genre_index = index;
        session
    }

    fn genres(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|g| String::from(*g)).collect()
    }

    fn press(state: &mut BrowserState, session: &SessionState, key: KeyCode) -> Action {
        state.handle_key(session, key, KeyModifiers::NONE, 10)
    }

    #[test]
    fn test_cycle_genre_forward_wraps() {
        // Arrange
        let genres = genres(&["Action", "Crime"]);

        // Act
        let first = cycle_genre(&genres, &GenreFilter::All, true);
        let second = cycle_genre(&genres, &first, true);
        let wrapped = cycle_genre(&genres, &second, true);

        // Assert
        assert_eq!(first, GenreFilter::Genre(String::from("Action")));
        assert_eq!(second, GenreFilter::Genre(String::from("Crime")));
        assert_eq!(wrapped, GenreFilter::All);
    }

    #[test]
    fn test_cycle_genre_backward_wraps() {
        // Arrange
        let genres = genres(&["Action", "Crime"]);

        // Act
        let last = cycle_genre(&genres, &GenreFilter::All, false);

        // Assert
        assert_eq!(last, GenreFilter::Genre(String::from("Crime")));
    }

    #[test]
    fn test_cycle_genre_without_genres_stays_all() {
        // Arrange
        let empty = BTreeSet::new();
        let stale = GenreFilter::Genre(String::from("Western"));

        // Act & Assert
        assert_eq!(cycle_genre(&empty, &GenreFilter::All, true), GenreFilter::All);
        assert_eq!(cycle_genre(&empty, &stale, true), GenreFilter::All);
    }

    #[test]
    fn test_search_mode_collects_query() {
        // Arrange
        let session = SessionState::default();
        let mut state = BrowserState::new(None);

        // Act
        press(&mut state, &session, KeyCode::Char('/'));
        for c in "batmann".chars() {
            press(&mut state, &session, KeyCode::Char(c));
        }
        press(&mut state, &session, KeyCode::Backspace);
        let action = press(&mut state, &session, KeyCode::Enter);

        // Assert
        assert_eq!(action, Action::Search(String::from("batman")));
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_search_mode_keys_are_text() {
        // Arrange
        let session = session_with_results();
        let mut state = BrowserState::new(None);
        state.input_mode = InputMode::Search;

        // Act
        let action = press(&mut state, &session, KeyCode::Char('q'));

        // Assert
        assert_eq!(action, Action::None);
        assert_eq!(state.input, "q");
    }

    #[test]
    fn test_enter_selects_visible_row() {
        // Arrange
        let session = session_with_results();
        let mut state = BrowserState::new(None);
        state.clamp(session.visible_results().len());

        // Act
        press(&mut state, &session, KeyCode::Down);
        let action = press(&mut state, &session, KeyCode::Enter);

        // Assert: newest first, so the second row is the 1989 entry
        assert_eq!(action, Action::Select(String::from("tt2")));
    }

    #[test]
    fn test_enter_on_empty_list_does_nothing() {
        // Arrange
        let session = SessionState::default();
        let mut state = BrowserState::new(None);

        // Act
        let action = press(&mut state, &session, KeyCode::Enter);

        // Assert
        assert_eq!(action, Action::None);
    }

    #[test]
    fn test_normal_mode_actions() {
        // Arrange
        let session = session_with_results();
        let mut state = BrowserState::new(None);

        // Act & Assert
        assert_eq!(press(&mut state, &session, KeyCode::Char('s')), Action::ToggleSort);
        assert_eq!(
            press(&mut state, &session, KeyCode::Char('g')),
            Action::SetGenre(GenreFilter::Genre(String::from("Action")))
        );
        assert_eq!(press(&mut state, &session, KeyCode::Char('n')), Action::NextPage);
        assert_eq!(press(&mut state, &session, KeyCode::Char('p')), Action::PrevPage);
        assert_eq!(
            press(&mut state, &session, KeyCode::Char('o')),
            Action::Open(String::from("tt1"))
        );
        assert_eq!(press(&mut state, &session, KeyCode::Char('q')), Action::Quit);
    }

    #[test]
    fn test_detail_view_keys() {
        // Arrange
        let mut session = session_with_results();
        session.view = ViewState::Detail(Box::new(MovieDetail {
            imdb_id: String::from("tt1"),
            ..MovieDetail::default()
        }));
        let mut state = BrowserState::new(None);

        // Act & Assert
        assert_eq!(press(&mut state, &session, KeyCode::Esc), Action::Back);
        assert_eq!(press(&mut state, &session, KeyCode::Char('b')), Action::Back);
        assert_eq!(
            press(&mut state, &session, KeyCode::Char('o')),
            Action::Open(String::from("tt1"))
        );
        assert_eq!(press(&mut state, &session, KeyCode::Char('s')), Action::None);
    }

    #[test]
    fn test_ctrl_c_quits_anywhere() {
        // Arrange
        let session = SessionState::default();
        let mut state = BrowserState::new(Some("batman"));
        state.input_mode = InputMode::Search;

        // Act
        let action = state.handle_key(
            &session,
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
            10,
        );

        // Assert
        assert_eq!(action, Action::Quit);
        assert_eq!(state.input, "batman");
    }

    #[test]
    fn test_cursor_moves_and_clamps() {
        // Arrange
        let mut state = BrowserState::new(None);
        state.clamp(3);

        // Act & Assert
        state.move_up();
        assert_eq!(state.cursor(), 0);
        state.move_down(3);
        state.move_down(3);
        state.move_down(3);
        assert_eq!(state.cursor(), 2);
        state.page_up(10);
        assert_eq!(state.cursor(), 0);
        state.page_down(10, 3);
        assert_eq!(state.cursor(), 2);
        state.clamp(1);
        assert_eq!(state.cursor(), 0);
        state.clamp(0);
        assert!(state.table_state.selected().is_none());
    }
}
