pub mod ports;
pub mod load_books_use_case;
pub mod enrich_use_case;
