//! CLI command implementations

use std::sync::Arc;

use clap::{Subcommand, ValueEnum};
use marquee_catalog::{DetailRecord, MovieCatalog};
use marquee_core::{MarqueeConfig, PreferenceStore, Result, SearchSession, SearchState, Theme};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render;

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Search titles and print one page of results
    Search {
        /// Free-text title query
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Result page to show
        #[arg(short, long, default_value = "1")]
        page: u32,
    },
    /// Show full details for an IMDb identifier
    Detail {
        /// IMDb identifier, e.g. tt0848228
        imdb_id: String,
    },
    /// Interactive search session driven by lines on stdin
    Browse {
        /// Initial query instead of the configured one
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Show or change the color theme
    Theme {
        /// New theme, or toggle the current one
        #[arg(value_enum)]
        action: Option<ThemeAction>,
    },
}

/// Theme changes accepted by the `theme` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeAction {
    Light,
    Dark,
    Toggle,
}

/// Handle the CLI command
///
/// # Errors
/// Returns appropriate error based on the command that fails
pub async fn handle_command(command: Commands, config: MarqueeConfig) -> Result<()> {
    match command {
        Commands::Search { query, page } => search(&config, &query.join(" "), page).await,
        Commands::Detail { imdb_id } => show_detail(&config, &imdb_id).await,
        Commands::Browse { query } => browse(config, query).await,
        Commands::Theme { action } => change_theme(&config, action),
    }
}

/// Theme for rendering; a broken preference file falls back to the default.
fn load_theme(config: &MarqueeConfig) -> Theme {
    match PreferenceStore::open(&config.preferences.path) {
        Ok(store) => store.theme(),
        Err(e) => {
            tracing::warn!(error = %e, "Could not read preferences, using default theme");
            Theme::default()
        }
    }
}

/// Print one page of results
///
/// # Errors
/// - `MarqueeError::Catalog` - Lookup failed (network or no matches)
pub async fn search(config: &MarqueeConfig, query: &str, page: u32) -> Result<()> {
    let catalog = config.build_catalog()?;
    let results = catalog.search_by_title(query, page).await?;

    print!(
        "{}",
        render::render_results(query, page.max(1), &results, load_theme(config))
    );
    Ok(())
}

/// Print the detail panel for one title
///
/// Lookup failures are rendered in place of the details, like the
/// interactive view does.
///
/// # Errors
/// - `MarqueeError::Configuration` - HTTP client could not be built
pub async fn show_detail(config: &MarqueeConfig, imdb_id: &str) -> Result<()> {
    let catalog = config.build_catalog()?;
    let record = DetailRecord::from_result(imdb_id, catalog.fetch_detail(imdb_id).await);

    print!("{}", render::render_detail(&record, load_theme(config)));
    Ok(())
}

/// Show, set or toggle the persisted theme
///
/// # Errors
/// - `MarqueeError::Preferences` - Preference file unreadable or unwritable
pub fn change_theme(config: &MarqueeConfig, action: Option<ThemeAction>) -> Result<()> {
    let mut store = PreferenceStore::open(&config.preferences.path)?;

    let theme = match action {
        None => store.theme(),
        Some(ThemeAction::Toggle) => store.toggle_theme()?,
        Some(ThemeAction::Light) => {
            store.set_theme(Theme::Light)?;
            Theme::Light
        }
        Some(ThemeAction::Dark) => {
            store.set_theme(Theme::Dark)?;
            Theme::Dark
        }
    };

    println!("Theme: {theme}");
    Ok(())
}

/// One line of interactive input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseInput {
    /// Replacement query text, debounced like keystrokes
    Text(String),
    /// Search the current text now
    Submit,
    NextPage,
    PreviousPage,
    Page(u32),
    /// Open details by list position (1-based) or IMDb id
    Open(String),
    Close,
    ToggleTheme,
    Help,
    Quit,
    Unknown(String),
}

impl BrowseInput {
    pub fn parse(line: &str) -> Self {
        let Some(command) = line.strip_prefix(':') else {
            return Self::Text(line.to_string());
        };

        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let argument = parts.next();

        match (name, argument) {
            ("go", None) => Self::Submit,
            ("n" | "next", None) => Self::NextPage,
            ("p" | "prev", None) => Self::PreviousPage,
            ("page", Some(page)) => match page.parse() {
                Ok(page) => Self::Page(page),
                Err(_) => Self::Unknown(line.to_string()),
            },
            ("open" | "o", Some(target)) => Self::Open(target.to_string()),
            ("close" | "c", None) => Self::Close,
            ("theme", None) => Self::ToggleTheme,
            ("help" | "h", None) => Self::Help,
            ("q" | "quit", None) => Self::Quit,
            _ => Self::Unknown(line.to_string()),
        }
    }
}

/// Resolves `:open` targets: small numbers pick from the displayed list.
fn resolve_open_target(target: &str, state: &SearchState) -> String {
    target
        .parse::<usize>()
        .ok()
        .and_then(|position| position.checked_sub(1))
        .and_then(|index| state.results.items.get(index))
        .map(|movie| movie.imdb_id.clone())
        .unwrap_or_else(|| target.to_string())
}

const BROWSE_HELP: &str = "\
Type to search (each line replaces the query).
  :go          search now
  :n / :p      next / previous page
  :page N      jump to page N
  :open X      open details by list number or IMDb id
  :close       close details
  :theme       toggle light/dark
  :q           quit";

/// Run an interactive session until `:q` or end of input
///
/// # Errors
/// - `MarqueeError::Io` - Reading stdin failed
/// - `MarqueeError::Preferences` - Preference file unreadable or unwritable
pub async fn browse(config: MarqueeConfig, query: Option<String>) -> Result<()> {
    let catalog: Arc<dyn MovieCatalog> = Arc::new(config.build_catalog()?);
    let mut preferences = PreferenceStore::open(&config.preferences.path)?;
    let mut theme = preferences.theme();

    let mut session_config = config.session.clone();
    if let Some(query) = query {
        session_config.initial_query = query;
    }

    let session = SearchSession::new(catalog, &session_config);
    let mut updates = session.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{BROWSE_HELP}");
    session.start();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                print!("{}", render::render_screen(&state, theme));
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };

                match BrowseInput::parse(&line) {
                    BrowseInput::Text(text) => session.on_query_change(text),
                    BrowseInput::Submit => session.submit(),
                    BrowseInput::NextPage => {
                        session.next_page();
                    }
                    BrowseInput::PreviousPage => {
                        session.previous_page();
                    }
                    BrowseInput::Page(page) => {
                        session.on_page_change(page);
                    }
                    BrowseInput::Open(target) => {
                        let imdb_id = resolve_open_target(&target, &session.state());
                        session.open_details(imdb_id);
                    }
                    BrowseInput::Close => session.close_details(),
                    BrowseInput::ToggleTheme => {
                        theme = preferences.toggle_theme()?;
                        print!("{}", render::render_screen(&session.state(), theme));
                    }
                    BrowseInput::Help => println!("{BROWSE_HELP}"),
                    BrowseInput::Quit => break,
                    BrowseInput::Unknown(input) => eprintln!("Unknown command: {input} (try :help)"),
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use marquee_catalog::{MediaType, MovieSummary, ResultPage};

    use super::*;

    #[test]
    fn test_plain_lines_are_query_text() {
        assert_eq!(
            BrowseInput::parse("the dark knight"),
            BrowseInput::Text("the dark knight".to_string())
        );
        assert_eq!(BrowseInput::parse(""), BrowseInput::Text(String::new()));
    }

    #[test]
    fn test_commands() {
        assert_eq!(BrowseInput::parse(":n"), BrowseInput::NextPage);
        assert_eq!(BrowseInput::parse(":prev"), BrowseInput::PreviousPage);
        assert_eq!(BrowseInput::parse(":page 4"), BrowseInput::Page(4));
        assert_eq!(
            BrowseInput::parse(":open tt0848228"),
            BrowseInput::Open("tt0848228".to_string())
        );
        assert_eq!(BrowseInput::parse(":go"), BrowseInput::Submit);
        assert_eq!(BrowseInput::parse(":q"), BrowseInput::Quit);
    }

    #[test]
    fn test_malformed_commands_are_unknown() {
        assert_eq!(
            BrowseInput::parse(":page four"),
            BrowseInput::Unknown(":page four".to_string())
        );
        assert_eq!(
            BrowseInput::parse(":open"),
            BrowseInput::Unknown(":open".to_string())
        );
    }

    #[test]
    fn test_open_target_by_position() {
        let state = SearchState {
            results: ResultPage {
                items: vec![MovieSummary {
                    imdb_id: "tt0848228".to_string(),
                    title: "The Avengers".to_string(),
                    year: None,
                    media_type: MediaType::Movie,
                    poster: None,
                }],
                total: 1,
            },
            ..SearchState::default()
        };

        assert_eq!(resolve_open_target("1", &state), "tt0848228");
        assert_eq!(resolve_open_target("2", &state), "2");
        assert_eq!(resolve_open_target("0", &state), "0");
        assert_eq!(resolve_open_target("tt1", &state), "tt1");
    }
}
