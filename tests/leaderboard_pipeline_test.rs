use anyhow::Result;
use async_trait::async_trait;
use bookwormz::app::enrich_use_case::EnrichUseCase;
use bookwormz::app::load_books_use_case::LoadBooksUseCase;
use bookwormz::app::ports::{HttpClientPort, HttpGetResult};
use bookwormz::config::{CatalogConfig, EnrichmentConfig};
use bookwormz::domain::ReadingStatus;
use bookwormz::error::BookwormzError;
use bookwormz::pipeline::{build_view, FeedSource, Filter, SortKey};
use reqwest::Url;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const FEED_URL: &str = "https://sheets.example/d/e/pub?output=csv";
const CATALOG_URL: &str = "https://catalog.example/books/v1/volumes";

const FEED: &str = "\
Book Title,Author,Year Published,Who Picked,Date Picked,Don Score,Dave Score,Chan Score,Average Score,ISBN,Goodreads score
Tomorrow and Tomorrow and Tomorrow,Gabrielle Zevin,2022,Don,Mar 2023,88.50%,77.60%,80.10%,82.07%,9780593321201,
The Wager,\"Grann, David\",2023,Chan,May 2023,77.00%,82.50%,87.30%,82.27%,,83%
Lonesome Dove,Larry McMurtry,1985,Dave,Mar 2024,94.20%,96.91%,93.90%,95.00%,,
,Orphan Author,2020,Don,,50%,50%,50%,50%,,
Fourth Wing,Rebecca Yarros,2023,Don,Dec 2025,,,,,,
";

/// Fake HTTP: serves the feed at FEED_URL and catalog JSON keyed by the `q` parameter.
#[derive(Default)]
struct FakeWeb {
    feed_status: u16,
    catalog: HashMap<String, serde_json::Value>,
    catalog_fails: bool,
    requests: Mutex<Vec<String>>,
}

impl FakeWeb {
    fn with_feed() -> Self {
        Self { feed_status: 200, ..Default::default() }
    }

    fn volumes(mut self, query: &str, items: serde_json::Value) -> Self {
        self.catalog.insert(query.to_string(), json!({ "items": items }));
        self
    }

    fn catalog_queries(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.starts_with(CATALOG_URL))
            .map(|u| {
                Url::parse(u)
                    .unwrap()
                    .query_pairs()
                    .find(|(k, _)| k == "q")
                    .map(|(_, v)| v.into_owned())
                    .unwrap()
            })
            .collect()
    }
}

#[async_trait]
impl HttpClientPort for FakeWeb {
    async fn get(&self, url: &str) -> bookwormz::error::Result<HttpGetResult> {
        self.requests.lock().unwrap().push(url.to_string());
        if url == FEED_URL {
            return Ok(HttpGetResult {
                status: self.feed_status,
                bytes: FEED.as_bytes().to_vec(),
            });
        }
        if self.catalog_fails {
            return Err(BookwormzError::Catalog { message: "connection reset".into() });
        }
        let parsed = Url::parse(url).expect("valid url");
        let query = parsed
            .query_pairs()
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default();
        let body = self
            .catalog
            .get(&query)
            .cloned()
            .unwrap_or_else(|| json!({ "kind": "books#volumes", "totalItems": 0 }));
        Ok(HttpGetResult {
            status: 200,
            bytes: serde_json::to_vec(&body).unwrap(),
        })
    }
}

fn catalog_config() -> CatalogConfig {
    CatalogConfig { base_url: CATALOG_URL.to_string(), ..CatalogConfig::default() }
}

fn feed() -> FeedSource {
    FeedSource::Url(FEED_URL.to_string())
}

#[tokio::test]
async fn feed_loads_and_classifies_books() -> Result<()> {
    let web = Arc::new(FakeWeb::with_feed());
    let books = LoadBooksUseCase::with_defaults(web).load(&feed()).await?;

    // five data rows, one without a title
    assert_eq!(books.len(), 4);
    assert_eq!(books[1].author.as_deref(), Some("Grann, David"));
    assert_eq!(books[1].goodreads_score, Some(83.0));
    assert_eq!(books[0].isbn.as_deref(), Some("9780593321201"));
    assert_eq!(books[1].isbn, None);

    let wing = books.iter().find(|b| b.title == "Fourth Wing").unwrap();
    assert_eq!(wing.status(), ReadingStatus::InProgress);
    let dove = books.iter().find(|b| b.title == "Lonesome Dove").unwrap();
    assert_eq!(dove.status(), ReadingStatus::Finished);
    assert_eq!(dove.avg_stars(), Some(4.75));
    Ok(())
}

#[tokio::test]
async fn feed_failure_is_all_or_nothing() -> Result<()> {
    let web = Arc::new(FakeWeb { feed_status: 503, ..Default::default() });
    let err = LoadBooksUseCase::with_defaults(web).load(&feed()).await.unwrap_err();
    assert!(matches!(err, BookwormzError::FeedFetch(_)));
    Ok(())
}

#[tokio::test]
async fn leaderboard_counts_only_finished_books() -> Result<()> {
    let web = Arc::new(FakeWeb::with_feed());
    let books = LoadBooksUseCase::with_defaults(web).load(&feed()).await?;
    let view = build_view(&books, &Filter::default(), SortKey::Score, &Default::default());

    assert_eq!(view.stats.finished_books, 3);
    let expected = (82.07 + 82.27 + 95.0) / 3.0;
    assert!((view.stats.group_average.unwrap() - expected).abs() < 1e-9);
    assert_eq!(view.stats.top_book.as_ref().unwrap().title, "Lonesome Dove");
    assert_eq!(view.stats.in_progress, vec!["Fourth Wing".to_string()]);
    assert_eq!(view.books.last().unwrap().book.title, "Fourth Wing");

    let dons = view.stats.picker_stats.iter().find(|p| p.member.name() == "Don").unwrap();
    assert_eq!(dons.picks, 2);
    assert_eq!(dons.average, Some(82.07));
    Ok(())
}

#[tokio::test]
async fn enrichment_attaches_ratings_by_title() -> Result<()> {
    let web = Arc::new(
        FakeWeb::with_feed()
            // ISBN hit has only a cover; rating comes from the title+author search
            .volumes(
                "isbn:9780593321201",
                json!([{ "volumeInfo": {
                    "imageLinks": { "thumbnail": "http://covers.example/tomorrow.jpg" }
                } }]),
            )
            .volumes(
                "intitle:Tomorrow and Tomorrow and Tomorrow inauthor:Gabrielle Zevin",
                json!([
                    { "volumeInfo": { "averageRating": 4.0, "ratingsCount": 12 } },
                    { "volumeInfo": { "averageRating": 4.2, "ratingsCount": 3100 } }
                ]),
            )
            .volumes(
                "intitle:The Wager inauthor:Grann, David",
                json!([{ "volumeInfo": { "averageRating": 4.1, "ratingsCount": 900,
                    "imageLinks": { "smallThumbnail": "http://covers.example/wager.jpg" } } }]),
            )
            .volumes(
                "intitle:Lonesome Dove",
                json!([{ "volumeInfo": { "averageRating": 4.5, "ratingsCount": 5000 } }]),
            ),
    );

    let books = LoadBooksUseCase::with_defaults(web.clone()).load(&feed()).await?;
    let enricher = EnrichUseCase::with_google_books(
        web.clone(),
        &catalog_config(),
        &EnrichmentConfig::default(),
    );

    let before = enricher.store().snapshot();
    let handle = enricher.start(&books);
    assert_eq!(handle.total(), 4);
    let matched = handle.finish().await;
    assert_eq!(matched, 3);

    // snapshot taken before the run stays empty
    assert!(before.is_empty());

    let snapshot = enricher.store().snapshot();
    let tomorrow = snapshot.get("Tomorrow and Tomorrow and Tomorrow").unwrap();
    assert_eq!(tomorrow.rating_stars, Some(4.2));
    assert_eq!(tomorrow.rating_count, 3100);
    assert_eq!(tomorrow.rating_percent, Some(84));
    assert_eq!(tomorrow.thumbnail_url.as_deref(), Some("https://covers.example/tomorrow.jpg"));

    let wager = snapshot.get("The Wager").unwrap();
    assert_eq!(wager.thumbnail_url.as_deref(), Some("https://covers.example/wager.jpg"));

    // title+author found nothing, title-only did
    assert_eq!(snapshot.get("Lonesome Dove").unwrap().rating_count, 5000);
    assert!(snapshot.get("Fourth Wing").is_none());

    // sequential lookups run in feed order
    let queries = web.catalog_queries();
    assert_eq!(queries[0], "isbn:9780593321201");
    assert_eq!(queries[1], "intitle:Tomorrow and Tomorrow and Tomorrow inauthor:Gabrielle Zevin");
    assert_eq!(queries[2], "intitle:The Wager inauthor:Grann, David");

    let view = build_view(&books, &Filter::default(), SortKey::Date, &snapshot);
    assert_eq!(view.books.iter().filter(|c| c.catalog.is_some()).count(), 3);
    Ok(())
}

#[tokio::test]
async fn catalog_outage_leaves_books_unenriched() -> Result<()> {
    let web = Arc::new(FakeWeb { catalog_fails: true, ..FakeWeb::with_feed() });
    let books = LoadBooksUseCase::with_defaults(web.clone()).load(&feed()).await?;
    let enricher = EnrichUseCase::with_google_books(
        web,
        &catalog_config(),
        &EnrichmentConfig { enabled: true, concurrency: 2 },
    );

    let mut handle = enricher.start(&books);
    let mut updates = 0;
    while let Some(update) = handle.next_update().await {
        assert!(update.catalog.is_none());
        updates += 1;
    }
    assert_eq!(updates, books.len());
    assert!(enricher.store().is_empty());
    Ok(())
}
