pub mod activity;
pub mod analysis;
pub mod essay;
pub mod learning;
pub mod profile;

pub use activity::*;
pub use analysis::*;
pub use essay::*;
pub use learning::*;
pub use profile::*;
