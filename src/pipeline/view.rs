use serde::Serialize;
use std::cmp::Ordering;
use std::str::FromStr;

use crate::constants;
use crate::domain::{BookRecord, CatalogMatch, Member, ReadingStatus};
use crate::pipeline::processing::enrich::EnrichmentSnapshot;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Feed order; the sheet is kept chronologically.
    #[default]
    Date,
    /// Average score, best first; unscored books last.
    Score,
    Title,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "score" => Ok(SortKey::Score),
            "title" => Ok(SortKey::Title),
            other => Err(format!("unknown sort key '{other}' (expected date, score or title)")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Filter {
    /// `None` or `"All"` matches every picker.
    pub picker: Option<String>,
    /// Case-insensitive title substring.
    pub search: String,
}

impl Filter {
    pub fn matches(&self, book: &BookRecord) -> bool {
        let picker_ok = match self.picker.as_deref() {
            None | Some(constants::ALL_PICKERS) => true,
            Some(p) => book.picker.as_deref() == Some(p),
        };
        picker_ok && book.title.to_lowercase().contains(&self.search.to_lowercase())
    }
}

/// Colour tier for a percentage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Great,
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn for_score(score: f64) -> Self {
        match score {
            s if s >= 90.0 => ScoreBand::Excellent,
            s if s >= 80.0 => ScoreBand::Great,
            s if s >= 70.0 => ScoreBand::Good,
            s if s >= 60.0 => ScoreBand::Fair,
            _ => ScoreBand::Poor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickerStats {
    pub member: Member,
    pub picks: usize,
    /// Mean average score over this member's finished picks.
    pub average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberAverage {
    pub member: Member,
    pub scored: usize,
    pub average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopBook {
    pub title: String,
    pub avg_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardStats {
    pub total_books: usize,
    pub finished_books: usize,
    pub group_average: Option<f64>,
    pub picker_stats: Vec<PickerStats>,
    pub member_averages: Vec<MemberAverage>,
    pub top_book: Option<TopBook>,
    pub in_progress: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookCard {
    #[serde(flatten)]
    pub book: BookRecord,
    pub status: ReadingStatus,
    pub avg_stars: Option<f64>,
    pub band: Option<ScoreBand>,
    pub catalog: Option<CatalogMatch>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardView {
    pub stats: LeaderboardStats,
    pub sort: SortKey,
    pub shown: usize,
    pub total: usize,
    pub books: Vec<BookCard>,
}

/// Derive the filtered, sorted card list and the whole-club statistics.
///
/// Statistics always cover every book; the filter only narrows the cards.
pub fn build_view(
    books: &[BookRecord],
    filter: &Filter,
    sort: SortKey,
    enrichment: &EnrichmentSnapshot,
) -> LeaderboardView {
    let mut selected: Vec<&BookRecord> = books.iter().filter(|b| filter.matches(b)).collect();
    sort_books(&mut selected, sort);

    let cards: Vec<BookCard> = selected
        .into_iter()
        .map(|book| BookCard {
            status: book.status(),
            avg_stars: book.avg_stars(),
            band: book.avg_score.map(ScoreBand::for_score),
            catalog: enrichment.get(&book.title).cloned(),
            book: book.clone(),
        })
        .collect();

    LeaderboardView {
        stats: compute_stats(books),
        sort,
        shown: cards.len(),
        total: books.len(),
        books: cards,
    }
}

pub fn sort_books(books: &mut [&BookRecord], sort: SortKey) {
    match sort {
        SortKey::Date => {}
        SortKey::Score => books.sort_by(|a, b| match (a.avg_score, b.avg_score) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
        SortKey::Title => books.sort_by_key(|b| b.title.to_lowercase()),
    }
}

pub fn compute_stats(books: &[BookRecord]) -> LeaderboardStats {
    let finished: Vec<&BookRecord> = books.iter().filter(|b| b.is_finished()).collect();

    let picker_stats = Member::ALL
        .iter()
        .map(|&member| {
            let picks: Vec<&BookRecord> = books
                .iter()
                .filter(|b| b.picker.as_deref() == Some(member.name()))
                .collect();
            PickerStats {
                member,
                picks: picks.len(),
                average: mean(picks.iter().filter_map(|b| b.avg_score)),
            }
        })
        .collect();

    let member_averages = Member::ALL
        .iter()
        .map(|&member| {
            let scores: Vec<f64> = books.iter().filter_map(|b| b.member_score(member)).collect();
            MemberAverage {
                member,
                scored: scores.len(),
                average: mean(scores.into_iter()),
            }
        })
        .collect();

    // First book wins ties
    let top_book = finished
        .iter()
        .filter_map(|b| b.avg_score.map(|s| (b, s)))
        .fold(None::<(&&BookRecord, f64)>, |best, (b, s)| match best {
            Some((_, top)) if top >= s => best,
            _ => Some((b, s)),
        })
        .map(|(b, s)| TopBook { title: b.title.clone(), avg_score: s });

    LeaderboardStats {
        total_books: books.len(),
        finished_books: finished.len(),
        group_average: mean(finished.iter().filter_map(|b| b.avg_score)),
        picker_stats,
        member_averages,
        top_book,
        in_progress: books
            .iter()
            .filter(|b| b.is_in_progress())
            .map(|b| b.title.clone())
            .collect(),
    }
}

/// Mean of present values; absent values are excluded rather than counted as zero.
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}
