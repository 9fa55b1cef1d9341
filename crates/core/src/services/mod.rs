pub mod analytics_service;
pub mod export_service;
pub mod journal_service;
pub mod period_service;
pub mod sample_service;
