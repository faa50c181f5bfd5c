pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod learning;
pub mod logging;
pub mod models;
pub mod output;
