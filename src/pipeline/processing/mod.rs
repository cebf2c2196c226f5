// Pipeline processing: CSV parsing, row normalization, catalog matching, enrichment

pub mod parser;
pub mod normalize;
pub mod catalog;
pub mod enrich;
