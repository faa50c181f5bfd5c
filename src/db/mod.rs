pub mod analysis_repo;
pub mod connection;
pub mod essay_repo;
pub mod migrations;
pub mod progress_repo;
pub mod storage_repo;

pub use connection::*;
