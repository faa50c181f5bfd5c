pub mod client;
pub mod essays;
pub mod portfolio;
pub mod profile;

pub use client::ApiClient;
