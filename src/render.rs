//! Plain-text leaderboard rendering for the terminal.

use std::fmt::Write;

use crate::domain::{CatalogMatch, Member, ReadingStatus};
use crate::pipeline::view::{BookCard, LeaderboardStats, LeaderboardView, ScoreBand};

pub fn render_view(view: &LeaderboardView) -> String {
    let mut out = render_stats(&view.stats);
    let _ = writeln!(out, "\nShowing {} of {} books\n", view.shown, view.total);

    if view.books.is_empty() {
        out.push_str("No books found\n");
        return out;
    }
    for card in &view.books {
        out.push_str(&render_card(card));
        out.push('\n');
    }
    out
}

pub fn render_stats(stats: &LeaderboardStats) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "The Book Wormz: {} books, {} finished",
        stats.total_books, stats.finished_books
    );
    let _ = writeln!(out, "  Group avg     {}", percent(stats.group_average));
    for p in &stats.picker_stats {
        let _ = writeln!(
            out,
            "  {:<13} {}  ({} books)",
            format!("{}'s picks", p.member.name()),
            percent(p.average),
            p.picks
        );
    }
    if let Some(top) = &stats.top_book {
        let _ = writeln!(out, "  Top rated     {} ({:.2}%)", top.title, top.avg_score);
    }
    if !stats.in_progress.is_empty() {
        let _ = writeln!(out, "  Reading now   {}", stats.in_progress.join(", "));
    }
    out
}

pub fn render_card(card: &BookCard) -> String {
    let book = &card.book;
    let mut out = String::new();

    let _ = write!(out, "{}", book.title);
    if let Some(author) = &book.author {
        let _ = write!(out, " by {author}");
    }
    if let Some(year) = &book.year {
        let _ = write!(out, " ({year})");
    }
    out.push('\n');

    let picker = book.picker.as_deref().unwrap_or("?");
    let _ = writeln!(out, "  {}'s pick  {}", picker, book.date.as_deref().unwrap_or(""));

    match card.status {
        ReadingStatus::InProgress => out.push_str("  Group score   reading now\n"),
        _ => {
            let _ = writeln!(
                out,
                "  Group score   {}  {}{}",
                percent(book.avg_score),
                stars(card.avg_stars),
                card.band.map(band_label).map(|b| format!("  [{b}]")).unwrap_or_default()
            );
        }
    }
    for member in Member::ALL {
        let _ = writeln!(out, "    {:<6} {}", member.name(), percent(book.member_score(member)));
    }
    if let Some(goodreads) = book.goodreads_score {
        let _ = writeln!(out, "    Goodreads {goodreads:.1}%");
    }
    if let Some(catalog) = &card.catalog {
        if let Some(line) = catalog_line(catalog) {
            let _ = writeln!(out, "    Catalog {line}");
        }
    }
    out
}

/// One-line catalog rating, or `None` when the match only carried a cover.
pub fn catalog_line(catalog: &CatalogMatch) -> Option<String> {
    let rating = catalog.rating_stars?;
    Some(format!(
        "{:.1}/5 ({}%, {} ratings)",
        rating,
        catalog.rating_percent.unwrap_or(0),
        catalog.rating_count
    ))
}

fn percent(score: Option<f64>) -> String {
    score.map(|s| format!("{s:.1}%")).unwrap_or_else(|| "-".to_string())
}

fn stars(value: Option<f64>) -> String {
    value.map(|s| format!("{s:.2}★")).unwrap_or_default()
}

fn band_label(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::Excellent => "excellent",
        ScoreBand::Great => "great",
        ScoreBand::Good => "good",
        ScoreBand::Fair => "fair",
        ScoreBand::Poor => "poor",
    }
}
