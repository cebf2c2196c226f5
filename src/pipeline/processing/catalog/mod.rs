// Catalog matching: candidate selection and the ISBN / title+author / title fallback chain

pub mod candidate;
pub mod matcher;

pub use candidate::{select_best, CatalogCandidate};
pub use matcher::{CatalogMatcher, CatalogQuery};
