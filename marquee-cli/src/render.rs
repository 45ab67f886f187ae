//! Plain-text rendering of search state for the terminal.

use std::fmt::Write;

use marquee_core::{SearchState, Theme};
use marquee_catalog::{DetailRecord, MovieDetail, MovieSummary, ResultPage, total_pages};

const RESET: &str = "\x1b[0m";

/// Accent color for headings, chosen by theme.
fn accent(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "\x1b[34m",
        Theme::Dark => "\x1b[96m",
    }
}

fn heading(out: &mut String, theme: Theme, text: &str) {
    let _ = writeln!(out, "{}{text}{RESET}", accent(theme));
}

fn summary_line(index: usize, movie: &MovieSummary) -> String {
    let year = movie.year.as_deref().unwrap_or("?");
    format!(
        "{index:>3}. {} ({year}) · {} [{}]",
        movie.title, movie.media_type, movie.imdb_id
    )
}

/// One page of search results with a page indicator.
pub fn render_results(query: &str, page: u32, results: &ResultPage, theme: Theme) -> String {
    let mut out = String::new();
    heading(&mut out, theme, &format!("Results for \"{}\"", query.trim()));

    if results.is_empty() {
        let _ = writeln!(out, "  No results.");
    } else {
        for (index, movie) in results.items.iter().enumerate() {
            let _ = writeln!(out, "{}", summary_line(index + 1, movie));
        }
    }

    let _ = writeln!(
        out,
        "Page {page} of {} ({} results)",
        total_pages(results.total),
        results.total
    );
    out
}

fn push_info(out: &mut String, label: &str, value: Option<&str>) {
    if let Some(value) = value {
        let _ = writeln!(out, "  {label:<9} {value}");
    }
}

fn render_movie(out: &mut String, detail: &MovieDetail, theme: Theme) {
    let year = detail.year.as_deref().unwrap_or("?");
    heading(out, theme, &format!("{} ({year})", detail.title));

    let facts: Vec<&str> = [&detail.rated, &detail.runtime, &detail.genre]
        .into_iter()
        .filter_map(|fact| fact.as_deref())
        .collect();
    if !facts.is_empty() {
        let _ = writeln!(out, "{}", facts.join(" · "));
    }

    if let Some(plot) = detail.plot.as_deref() {
        let _ = writeln!(out, "\n{plot}\n");
    }

    push_info(out, "Director", detail.director.as_deref());
    push_info(out, "Writer", detail.writer.as_deref());
    push_info(out, "Actors", detail.actors.as_deref());
    push_info(out, "Released", detail.released.as_deref());
    push_info(out, "Language", detail.language.as_deref());
    push_info(out, "Country", detail.country.as_deref());
    push_info(out, "Awards", detail.awards.as_deref());
    push_info(out, "Poster", detail.poster.as_deref());

    if !detail.ratings.is_empty() {
        let _ = writeln!(out, "Ratings");
        for rating in &detail.ratings {
            let _ = writeln!(out, "  - {}: {}", rating.source, rating.value);
        }
    }
}

/// Detail panel: the loaded metadata or the failure message in its place.
pub fn render_detail(record: &DetailRecord, theme: Theme) -> String {
    let mut out = String::new();
    match record {
        DetailRecord::Loaded(detail) => render_movie(&mut out, detail, theme),
        DetailRecord::Failed { imdb_id, message } => {
            heading(&mut out, theme, imdb_id);
            let _ = writeln!(out, "  {message}");
        }
    }
    out
}

/// Full interactive screen for the current session state.
pub fn render_screen(state: &SearchState, theme: Theme) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{:=<60}", "");
    heading(&mut out, theme, &format!("Marquee [{theme}]"));
    let _ = writeln!(out, "Search: {}", state.query.text);

    if state.list_loading {
        let _ = writeln!(out, "Searching...");
    } else if let Some(error) = state.list_error.as_deref() {
        let _ = writeln!(out, "Error: {error}");
    } else {
        out.push_str(&render_results(
            &state.results_query.text,
            state.results_query.page,
            &state.results,
            theme,
        ));
    }

    if let Some(selected) = state.selected_id.as_deref() {
        let _ = writeln!(out, "{:-<60}", "");
        if state.detail_loading {
            let _ = writeln!(out, "Loading details for {selected}...");
        } else if let Some(record) = state.detail.as_ref() {
            out.push_str(&render_detail(record, theme));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use marquee_catalog::{MediaType, Query, Rating};

    use super::*;

    fn sample_results() -> ResultPage {
        ResultPage {
            items: vec![MovieSummary {
                imdb_id: "tt0848228".to_string(),
                title: "The Avengers".to_string(),
                year: Some("2012".to_string()),
                media_type: MediaType::Movie,
                poster: None,
            }],
            total: 137,
        }
    }

    #[test]
    fn test_results_list_and_page_indicator() {
        let text = render_results("Avengers", 2, &sample_results(), Theme::Light);
        assert!(text.contains("  1. The Avengers (2012) · movie [tt0848228]"));
        assert!(text.contains("Page 2 of 14 (137 results)"));
    }

    #[test]
    fn test_empty_results() {
        let text = render_results("", 1, &ResultPage::empty(), Theme::Dark);
        assert!(text.contains("No results."));
        assert!(text.contains("Page 1 of 1 (0 results)"));
    }

    #[test]
    fn test_detail_skips_missing_fields() {
        let record = DetailRecord::Loaded(MovieDetail {
            imdb_id: "tt0113277".to_string(),
            title: "Heat".to_string(),
            year: Some("1995".to_string()),
            rated: Some("R".to_string()),
            runtime: Some("170 min".to_string()),
            director: Some("Michael Mann".to_string()),
            ratings: vec![Rating {
                source: "Internet Movie Database".to_string(),
                value: "8.3/10".to_string(),
            }],
            ..MovieDetail::default()
        });

        let text = render_detail(&record, Theme::Light);
        assert!(text.contains("Heat (1995)"));
        assert!(text.contains("R · 170 min"));
        assert!(text.contains("Director  Michael Mann"));
        assert!(text.contains("- Internet Movie Database: 8.3/10"));
        assert!(!text.contains("Awards"));
    }

    #[test]
    fn test_failed_detail_shows_message() {
        let record = DetailRecord::Failed {
            imdb_id: "tt1".to_string(),
            message: "Incorrect IMDb ID.".to_string(),
        };
        assert!(render_detail(&record, Theme::Light).contains("Incorrect IMDb ID."));
    }

    #[test]
    fn test_screen_prefers_error_over_results() {
        let state = SearchState {
            query: Query::new("zzzz"),
            list_error: Some("Movie not found!".to_string()),
            ..SearchState::default()
        };

        let text = render_screen(&state, Theme::Dark);
        assert!(text.contains("Marquee [dark]"));
        assert!(text.contains("Error: Movie not found!"));
        assert!(!text.contains("Page 1 of 1"));
    }

    #[test]
    fn test_screen_labels_results_with_applied_query() {
        let state = SearchState {
            query: Query::new("Aliens"),
            results: sample_results(),
            results_query: Query::new("Avengers").at_page(2),
            ..SearchState::default()
        };

        let text = render_screen(&state, Theme::Light);
        assert!(text.contains("Search: Aliens"));
        assert!(text.contains("Results for \"Avengers\""));
        assert!(text.contains("Page 2 of 14"));
        assert!(!text.contains("Results for \"Aliens\""));
    }

    #[test]
    fn test_screen_shows_detail_loading() {
        let state = SearchState {
            selected_id: Some("tt1".to_string()),
            detail_loading: true,
            ..SearchState::default()
        };
        assert!(render_screen(&state, Theme::Light).contains("Loading details for tt1..."));
    }
}
