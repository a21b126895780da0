pub mod book;
pub mod library;
pub mod query;
pub mod statistics;
