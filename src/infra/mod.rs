pub mod google_books;
pub mod http_client;
