use tracing::debug;

use crate::constants;
use crate::domain::{BookRecord, RawRow};

/// Trait for turning raw spreadsheet rows into book records
pub trait Normalizer {
    /// `None` means the row is dropped (no title).
    fn normalize(&self, row: &RawRow) -> Option<BookRecord>;

    /// Normalize every row, keeping feed order and dropping untitled rows.
    fn normalize_all(&self, rows: &[RawRow]) -> Vec<BookRecord> {
        let books: Vec<BookRecord> = rows.iter().filter_map(|row| self.normalize(row)).collect();
        debug!(
            "normalized {} of {} rows ({} dropped)",
            books.len(),
            rows.len(),
            rows.len() - books.len()
        );
        books
    }
}

/// Normalizer for the club spreadsheet's column layout.
#[derive(Debug, Default, Clone, Copy)]
pub struct SheetNormalizer;

impl SheetNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Normalizer for SheetNormalizer {
    fn normalize(&self, row: &RawRow) -> Option<BookRecord> {
        let title = text_field(row, constants::COL_TITLE)?;

        Some(BookRecord {
            author: text_field(row, constants::COL_AUTHOR),
            year: text_field(row, constants::COL_YEAR),
            picker: text_field(row, constants::COL_PICKER),
            date: text_field(row, constants::COL_DATE),
            isbn: text_field(row, constants::COL_ISBN),
            don_score: score_field(row, constants::COL_DON_SCORE),
            dave_score: score_field(row, constants::COL_DAVE_SCORE),
            chan_score: score_field(row, constants::COL_CHAN_SCORE),
            avg_score: score_field(row, constants::COL_AVG_SCORE),
            goodreads_score: score_field(row, constants::COL_GOODREADS),
            title,
        })
    }
}

/// Trimmed cell value; missing or empty is `None`.
fn text_field(row: &RawRow, column: &str) -> Option<String> {
    row.get(column)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn score_field(row: &RawRow, column: &str) -> Option<f64> {
    let raw = row.get(column)?;
    let parsed = parse_score(raw);
    if parsed.is_none() && !raw.trim().is_empty() {
        debug!("ignoring non-numeric {} value {:?}", column, raw);
    }
    parsed
}

/// Parse a percentage cell such as `85.5%` or `85.5`.
///
/// Empty means "not yet rated". Values are not range-checked.
pub fn parse_score(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    number.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReadingStatus;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn parses_percent_scores() {
        assert_eq!(parse_score("85.5%"), Some(85.5));
        assert_eq!(parse_score(" 70 "), Some(70.0));
        assert_eq!(parse_score(""), None);
        assert_eq!(parse_score("   "), None);
        assert_eq!(parse_score("n/a"), None);
    }

    #[test]
    fn out_of_range_scores_pass_through() {
        assert_eq!(parse_score("104.2%"), Some(104.2));
        assert_eq!(parse_score("-3"), Some(-3.0));
    }

    #[test]
    fn full_row_is_finished() {
        let r = row(&[
            ("Book Title", "Lonesome Dove"),
            ("Author", "Larry McMurtry"),
            ("Year Published", "1985"),
            ("Who Picked", "Dave"),
            ("Date Picked", "Mar 2024"),
            ("Don Score", "94.20%"),
            ("Dave Score", "96.91%"),
            ("Chan Score", "93.90%"),
            ("Average Score", "95.00%"),
            ("ISBN", ""),
        ]);
        let book = SheetNormalizer.normalize(&r).unwrap();
        assert_eq!(book.title, "Lonesome Dove");
        assert_eq!(book.picker.as_deref(), Some("Dave"));
        assert_eq!(book.avg_score, Some(95.0));
        assert_eq!(book.avg_stars(), Some(4.75));
        assert_eq!(book.isbn, None);
        assert_eq!(book.goodreads_score, None);
        assert_eq!(book.status(), ReadingStatus::Finished);
    }

    #[test]
    fn unscored_row_is_in_progress() {
        let r = row(&[
            ("Book Title", "Fourth Wing"),
            ("Who Picked", "Don"),
            ("Don Score", ""),
            ("Dave Score", ""),
            ("Chan Score", ""),
            ("Average Score", ""),
        ]);
        let book = SheetNormalizer.normalize(&r).unwrap();
        assert_eq!(book.status(), ReadingStatus::InProgress);
        assert_eq!(book.avg_stars(), None);
    }

    #[test]
    fn untitled_rows_are_dropped() {
        let rows = vec![
            row(&[("Book Title", "Dune")]),
            row(&[("Book Title", "   "), ("Author", "Nobody")]),
            row(&[("Author", "Missing Column")]),
        ];
        let books = SheetNormalizer.normalize_all(&rows);
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Dune");
    }

    #[test]
    fn isbn_kept_when_present() {
        let r = row(&[("Book Title", "Dune"), ("ISBN", " 9780441172719 ")]);
        let book = SheetNormalizer.normalize(&r).unwrap();
        assert_eq!(book.isbn.as_deref(), Some("9780441172719"));
    }
}
