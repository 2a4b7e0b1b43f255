pub mod ingestion;
pub mod lending;
