use tracing::debug;

use crate::domain::RawRow;

/// Turns raw feed text into header-keyed rows.
pub trait Parser {
    fn parse(&self, text: &str) -> Vec<RawRow>;
}

/// Line-oriented CSV parser with quote-toggle field scanning.
///
/// Never fails: malformed input degrades to best-effort rows. A `""` inside a
/// quoted field toggles the quote flag twice rather than emitting a literal quote.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvParser;

impl CsvParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_header(line: &str) -> Vec<String> {
        line.split(',').map(|cell| strip_quote_pair(cell.trim()).to_string()).collect()
    }
}

impl Parser for CsvParser {
    fn parse(&self, text: &str) -> Vec<RawRow> {
        let mut lines = text.split('\n');
        let headers = match lines.next() {
            Some(header) if !header.trim().is_empty() => Self::parse_header(header),
            _ => {
                debug!("CsvParser: empty document");
                return Vec::new();
            }
        };

        let rows: Vec<RawRow> = lines
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                let fields = split_fields(line);
                headers
                    .iter()
                    .enumerate()
                    .map(|(i, header)| {
                        let value = fields.get(i).cloned().unwrap_or_default();
                        (header.clone(), value)
                    })
                    .collect()
            })
            .collect();

        debug!("CsvParser: headers={} rows={}", headers.len(), rows.len());
        rows
    }
}

/// Scan one data line into trimmed fields.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

fn strip_quote_pair(cell: &str) -> &str {
    cell.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(cell)
}
