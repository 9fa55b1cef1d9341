pub mod analytics;
pub mod book;
pub mod entry;
pub mod journal;
pub mod settings;
