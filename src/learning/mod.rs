pub mod catalog;
pub mod steps;
