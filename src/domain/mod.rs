use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One spreadsheet data row: column header -> raw cell value.
pub type RawRow = HashMap<String, String>;

/// Club members who score every book, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Member {
    Don,
    Dave,
    Chan,
}

impl Member {
    pub const ALL: [Member; 3] = [Member::Don, Member::Dave, Member::Chan];

    pub fn name(self) -> &'static str {
        match self {
            Member::Don => "Don",
            Member::Dave => "Dave",
            Member::Chan => "Chan",
        }
    }
}

/// A normalized spreadsheet row.
///
/// Scores use percentage semantics; `None` means "not yet rated".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    pub author: Option<String>,
    pub year: Option<String>,
    pub picker: Option<String>,
    pub date: Option<String>,
    pub isbn: Option<String>,
    pub don_score: Option<f64>,
    pub dave_score: Option<f64>,
    pub chan_score: Option<f64>,
    pub avg_score: Option<f64>,
    pub goodreads_score: Option<f64>,
}

/// Where a book sits in the club's reading cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    /// Average score present.
    Finished,
    /// No member score and no average yet.
    InProgress,
    /// Some member scores in, average not committed.
    Scoring,
}

impl BookRecord {
    /// A record with nothing but a title; handy for tests and lookups.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: None,
            year: None,
            picker: None,
            date: None,
            isbn: None,
            don_score: None,
            dave_score: None,
            chan_score: None,
            avg_score: None,
            goodreads_score: None,
        }
    }

    pub fn member_score(&self, member: Member) -> Option<f64> {
        match member {
            Member::Don => self.don_score,
            Member::Dave => self.dave_score,
            Member::Chan => self.chan_score,
        }
    }

    pub fn status(&self) -> ReadingStatus {
        if self.avg_score.is_some() {
            ReadingStatus::Finished
        } else if Member::ALL.iter().all(|m| self.member_score(*m).is_none()) {
            ReadingStatus::InProgress
        } else {
            ReadingStatus::Scoring
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status() == ReadingStatus::Finished
    }

    pub fn is_in_progress(&self) -> bool {
        self.status() == ReadingStatus::InProgress
    }

    pub fn avg_stars(&self) -> Option<f64> {
        to_stars(self.avg_score)
    }

    pub fn member_stars(&self, member: Member) -> Option<f64> {
        to_stars(self.member_score(member))
    }
}

/// Percentage to five-star scale, rounded to two decimals.
pub fn to_stars(percent: Option<f64>) -> Option<f64> {
    percent.map(|p| ((p / 100.0 * 5.0) * 100.0).round() / 100.0)
}

/// Catalog-sourced rating and cover for a single book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogMatch {
    pub rating_stars: Option<f64>,
    pub rating_percent: Option<u32>,
    pub rating_count: u64,
    pub thumbnail_url: Option<String>,
}

impl CatalogMatch {
    pub fn new(
        rating_stars: Option<f64>,
        rating_count: u64,
        thumbnail_url: Option<String>,
    ) -> Self {
        Self {
            rating_stars,
            rating_percent: rating_stars.map(|s| (s * 20.0).round() as u32),
            rating_count,
            thumbnail_url,
        }
    }

    pub fn has_rating(&self) -> bool {
        self.rating_stars.is_some()
    }
}
