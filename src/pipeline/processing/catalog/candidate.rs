use serde::{Deserialize, Serialize};

use crate::domain::CatalogMatch;

/// One catalog search result, reduced to the fields used for matching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogCandidate {
    /// Average rating on the catalog's five-star scale
    pub average_rating: Option<f64>,
    pub ratings_count: Option<u64>,
    pub thumbnail_url: Option<String>,
}

impl CatalogCandidate {
    pub fn rated(average_rating: f64, ratings_count: u64) -> Self {
        Self {
            average_rating: Some(average_rating),
            ratings_count: Some(ratings_count),
            thumbnail_url: None,
        }
    }

    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }

    /// Has an average rating backed by at least one rating.
    pub fn is_rated(&self) -> bool {
        self.average_rating.is_some() && self.ratings_count.unwrap_or(0) > 0
    }

    fn count(&self) -> u64 {
        self.ratings_count.unwrap_or(0)
    }

    fn secure_thumbnail(&self) -> Option<String> {
        self.thumbnail_url.as_deref().map(secure_url)
    }
}

/// Pick the most-rated candidate, falling back to the first one for its cover.
///
/// Ties on rating count keep the earlier candidate. The fallback carries no
/// rating even if the first candidate has a rating with a zero count.
pub fn select_best(candidates: &[CatalogCandidate]) -> Option<CatalogMatch> {
    let first = candidates.first()?;

    let most_rated = candidates
        .iter()
        .filter(|c| c.is_rated())
        .fold(None::<&CatalogCandidate>, |best, c| match best {
            Some(b) if b.count() >= c.count() => Some(b),
            _ => Some(c),
        });

    Some(match most_rated {
        Some(c) => CatalogMatch::new(c.average_rating, c.count(), c.secure_thumbnail()),
        None => CatalogMatch::new(None, 0, first.secure_thumbnail()),
    })
}

/// Rewrite an `http://` URL to `https://`; anything else is returned as-is.
pub fn secure_url(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highest_count_wins() {
        let candidates = vec![
            CatalogCandidate::rated(4.2, 10),
            CatalogCandidate::rated(4.6, 500),
            CatalogCandidate { average_rating: None, ratings_count: Some(0), thumbnail_url: None },
        ];
        let best = select_best(&candidates).unwrap();
        assert_eq!(best.rating_stars, Some(4.6));
        assert_eq!(best.rating_count, 500);
        assert_eq!(best.rating_percent, Some(92));
    }

    #[test]
    fn tie_keeps_earlier_candidate() {
        let candidates = vec![
            CatalogCandidate::rated(3.9, 42).with_thumbnail("https://first"),
            CatalogCandidate::rated(4.9, 42).with_thumbnail("https://second"),
        ];
        let best = select_best(&candidates).unwrap();
        assert_eq!(best.rating_stars, Some(3.9));
        assert_eq!(best.thumbnail_url.as_deref(), Some("https://first"));
    }

    #[test]
    fn unrated_set_falls_back_to_first_thumbnail() {
        let candidates = vec![
            CatalogCandidate::default().with_thumbnail("http://books.example/cover1.jpg"),
            CatalogCandidate {
                average_rating: Some(4.0),
                ratings_count: Some(0),
                thumbnail_url: None,
            },
        ];
        let best = select_best(&candidates).unwrap();
        assert_eq!(best.rating_stars, None);
        assert_eq!(best.rating_percent, None);
        assert_eq!(best.rating_count, 0);
        assert_eq!(best.thumbnail_url.as_deref(), Some("https://books.example/cover1.jpg"));
    }

    #[test]
    fn empty_set_has_no_match() {
        assert!(select_best(&[]).is_none());
    }

    #[test]
    fn secure_url_only_touches_http() {
        assert_eq!(secure_url("http://a/b"), "https://a/b");
        assert_eq!(secure_url("https://a/b"), "https://a/b");
        assert_eq!(secure_url("data:image/png"), "data:image/png");
    }
}
