//! moviesearch - search and browse movies on OMDb.

/// Application configuration (TOML).
mod config;
/// Terminal UI components.
mod tui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{API_KEY_ENV, AppConfig, resolve_api_key, resolve_config_path};
use crate::tui::run_browser;
use moviesearch_api::omdb::{LocalOmdbApi, OmdbClient, OmdbReply, PlotLength};
use moviesearch_session::{GenreFilter, SEARCH_FAILED_MESSAGE, Session, SortOrder};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Search movies and list them with their genres.
    Search(SearchArgs),
    /// Show the details of one movie.
    Details(DetailsArgs),
    /// Browse movies interactively via TUI.
    Browse(BrowseArgs),
}

/// Sort direction argument.
#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    /// Oldest first.
    Asc,
    /// Newest first.
    Desc,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Asc => Self::Ascending,
            SortArg::Desc => Self::Descending,
        }
    }
}

/// Plot length argument.
#[derive(Clone, Copy, ValueEnum)]
enum PlotArg {
    /// Short plot.
    Short,
    /// Full plot.
    Full,
}

impl From<PlotArg> for PlotLength {
    fn from(arg: PlotArg) -> Self {
        match arg {
            PlotArg::Short => Self::Short,
            PlotArg::Full => Self::Full,
        }
    }
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Title to search for (e.g. "batman").
    #[arg(long, required = true)]
    query: String,
    /// Result page (10 results per page).
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Only list results whose genre contains this text.
    #[arg(long)]
    genre: Option<String>,
    /// Year sort order. Falls back to config, then "desc".
    #[arg(long, value_enum)]
    sort: Option<SortArg>,
}

/// Arguments for the `details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// IMDb identifier (e.g. "tt0372784").
    #[arg(long, required = true)]
    id: String,
    /// Plot length.
    #[arg(long, value_enum, default_value = "full")]
    plot: PlotArg,
}

/// Arguments for the `browse` subcommand.
#[derive(clap::Args)]
struct BrowseArgs {
    /// Initial search.
    #[arg(long)]
    query: Option<String>,
}

/// Builds an `OmdbClient` from the environment and config.
///
/// # Errors
///
/// Returns an error if no API key is available, the base URL is invalid,
/// or the client fails to build.
#[instrument(skip_all)]
fn build_omdb_client(config: &AppConfig) -> Result<OmdbClient> {
    let api_key = resolve_api_key(
        std::env::var(API_KEY_ENV).ok(),
        config.omdb.api_key.as_deref(),
    )?;

    let mut builder = OmdbClient::builder().api_key(api_key).user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(base_url) = &config.omdb.base_url {
        let url = Url::parse(base_url)
            .with_context(|| format!("invalid [omdb] base_url: {base_url}"))?;
        builder = builder.base_url(url);
    }

    builder.build().context("failed to build OMDb client")
}

/// Loads the config and builds a session from it.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or the client fails to build.
fn build_session(dir: Option<&PathBuf>) -> Result<Session<OmdbClient>> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;
    let client = build_omdb_client(&config)?;

    Ok(Session::new(client)
        .enrichment_policy(config.browse.enrichment)
        .sort_order(config.browse.sort))
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the session fails to build or the search request fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let mut session = build_session(dir)?;
    if let Some(sort) = args.sort {
        session = session.sort_order(sort.into());
    }
    if let Some(genre) = &args.genre {
        session.set_genre_filter(GenreFilter::from_selection(genre));
    }

    session.search_page(&args.query, args.page).await;

    let state = session.snapshot();
    match state.error.as_deref() {
        Some(SEARCH_FAILED_MESSAGE) => bail!("{SEARCH_FAILED_MESSAGE}: {}", args.query),
        Some(message) if state.results.is_empty() => {
            tracing::info!("{message}");
            return Ok(());
        }
        _ => {}
    }

    let genres: Vec<&str> = std::iter::once(GenreFilter::ALL)
        .chain(state.genres().iter().map(String::as_str))
        .collect();
    tracing::info!(
        "Total results: {} (page {}/{})",
        state.total_results,
        state.page,
        state.total_pages()
    );
    tracing::info!("Genres: {}", genres.join(", "));
    if state.genre_index.is_empty() {
        tracing::warn!("No genres available for these results");
    }
    tracing::info!("Sort: {}  Genre: {}", state.sort_order.label(), state.genre_filter);
    tracing::info!("ID\t\tYear\tTitle\t\t\tGenre");
    for result in state.visible_results() {
        tracing::info!(
            "{}\t{}\t{}\t\t{}",
            result.imdb_id,
            result.year,
            result.title,
            state.genre_index.genre_of(&result.imdb_id).unwrap_or("-"),
        );
    }

    Ok(())
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build, the request fails, or
/// the provider has no such title.
#[instrument(skip_all)]
async fn run_details(args: &DetailsArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;
    let client = build_omdb_client(&config)?;

    let detail = match client
        .movie_details(&args.id, args.plot.into())
        .await
        .context("OMDb lookup request failed")?
    {
        OmdbReply::Found(detail) => detail,
        OmdbReply::NotFound { error } => {
            bail!(
                "{}: {}",
                args.id,
                error.as_deref().unwrap_or("movie not found")
            )
        }
    };

    let na = moviesearch_api::omdb::NOT_AVAILABLE;
    tracing::info!("ID: {}", detail.imdb_id);
    tracing::info!("Title: {} ({})", detail.title, detail.year);
    tracing::info!("Rated: {}", detail.rated.as_deref().unwrap_or(na));
    tracing::info!("Released: {}", detail.released.as_deref().unwrap_or(na));
    tracing::info!("Runtime: {}", detail.runtime.as_deref().unwrap_or(na));
    tracing::info!("Genre: {}", detail.genre.as_deref().unwrap_or(na));
    tracing::info!("Director: {}", detail.director.as_deref().unwrap_or(na));
    tracing::info!("Actors: {}", detail.actors.as_deref().unwrap_or(na));
    tracing::info!("Rating: {}", detail.imdb_rating.as_deref().unwrap_or(na));
    tracing::info!("Poster: {}", detail.poster_url());
    tracing::info!("Plot: {}", detail.plot.as_deref().unwrap_or(na));

    Ok(())
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the session fails to build or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(args: &BrowseArgs, dir: Option<&PathBuf>) -> Result<()> {
    let session = Arc::new(build_session(dir)?);
    run_browser(session, args.query.as_deref())
        .await
        .context("movie browser TUI failed")
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    match cli.command {
        Commands::Search(args) => run_search(&args, cli.dir.as_ref()).await,
        Commands::Details(args) => run_details(&args, cli.dir.as_ref()).await,
        Commands::Browse(args) => run_browse(&args, cli.dir.as_ref()).await,
    }
}
