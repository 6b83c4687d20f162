#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]
#![allow(missing_docs)]

use moviesearch_api::omdb::OmdbClient;
use moviesearch_session::{GenreFilter, Session, SortOrder, ViewState};
use url::Url;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_BATMAN: &str = include_str!("../../../fixtures/omdb/search_batman.json");
const SEARCH_NOT_FOUND: &str = include_str!("../../../fixtures/omdb/search_not_found.json");

const GENRE_BEGINS: &str = r#"{"Title":"Batman Begins","Year":"2005","imdbID":"tt0372784","Genre":"Action, Crime","Director":"Christopher Nolan","Plot":"Bruce Wayne begins.","Poster":"N/A","Response":"True"}"#;
const GENRE_BATMAN: &str = r#"{"Title":"Batman","Year":"1989","imdbID":"tt0096895","Genre":"Crime","Director":"Tim Burton","Plot":"Gotham needs a hero.","Poster":"N/A","Response":"True"}"#;

fn client(server: &MockServer) -> OmdbClient {
    let base_url: Url = format!("{}/", server.uri()).parse().unwrap();
    OmdbClient::builder()
        .base_url(base_url)
        .api_key("test-key")
        .user_agent("moviesearch-test/0.0.0")
        .build()
        .unwrap()
}

async fn mount_batman(server: &MockServer) {
    Mock::given(method("GET"))
        .and(query_param("s", "batman"))
        .and(query_param("apikey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_BATMAN))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("i", "tt0372784"))
        .respond_with(ResponseTemplate::new(200).set_body_string(GENRE_BEGINS))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("i", "tt0096895"))
        .respond_with(ResponseTemplate::new(200).set_body_string(GENRE_BATMAN))
        .mount(server)
        .await;
}

fn visible_ids(session: &Session<OmdbClient>) -> Vec<String> {
    let state = session.snapshot();
    state
        .visible_results()
        .iter()
        .map(|r| r.imdb_id.clone())
        .collect()
}

#[tokio::test]
async fn test_batman_walkthrough() {
    // Arrange
    let server = MockServer::start().await;
    mount_batman(&server).await;
    let session = Session::new(client(&server));

    // Act: search
    session.search("batman").await;

    // Assert: newest first, genres from enrichment
    let state = session.snapshot();
    assert_eq!(state.results.len(), 2);
    assert!(!state.is_loading());
    assert!(state.error.is_none());
    let genres: Vec<&str> = state.genres().iter().map(String::as_str).collect();
    assert_eq!(genres, vec!["Action", "Crime"]);
    assert_eq!(visible_ids(&session), vec!["tt0372784", "tt0096895"]);

    // Act & Assert: toggle sort
    session.toggle_sort();
    assert_eq!(session.snapshot().sort_order, SortOrder::Ascending);
    assert_eq!(visible_ids(&session), vec!["tt0096895", "tt0372784"]);

    // Act & Assert: filter on a genre only one result has
    session.set_genre_filter(GenreFilter::from_selection("Action"));
    assert_eq!(visible_ids(&session), vec!["tt0372784"]);

    // Act & Assert: open the detail view
    session.select("tt0372784").await;
    let detail = session.snapshot().detail().cloned().unwrap();
    assert_eq!(detail.title, "Batman Begins");
    assert_eq!(detail.director.as_deref(), Some("Christopher Nolan"));

    // Act & Assert: back keeps filter and sort
    session.back();
    let state = session.snapshot();
    assert_eq!(state.view, ViewState::List);
    assert_eq!(state.genre_filter, GenreFilter::Genre(String::from("Action")));
    assert_eq!(visible_ids(&session), vec!["tt0372784"]);
}

#[tokio::test]
async fn test_not_found_search_shows_provider_message() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("s", "zzzzqqq"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_NOT_FOUND))
        .mount(&server)
        .await;
    let session = Session::new(client(&server));

    // Act
    session.search("zzzzqqq").await;

    // Assert
    let state = session.snapshot();
    assert!(state.results.is_empty());
    assert_eq!(state.error.as_deref(), Some("Movie not found!"));
    assert!(!state.is_loading());
}

#[tokio::test]
async fn test_enrichment_server_error_keeps_results() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("s", "batman"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_BATMAN))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("i", "tt0372784"))
        .respond_with(ResponseTemplate::new(200).set_body_string(GENRE_BEGINS))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("i", "tt0096895"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;
    let session = Session::new(client(&server));

    // Act
    session.search("batman").await;

    // Assert
    let state = session.snapshot();
    assert_eq!(state.results.len(), 2);
    assert!(state.genres().is_empty());
    assert!(state.error.is_none());
}

#[tokio::test]
async fn test_search_transport_failure_sets_error() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;
    let session = Session::new(client(&server));

    // Act
    session.search("batman").await;

    // Assert
    let state = session.snapshot();
    assert!(state.results.is_empty());
    assert_eq!(
        state.error.as_deref(),
        Some(moviesearch_session::SEARCH_FAILED_MESSAGE)
    );
}
