pub mod analysis;
pub mod fixtures;

pub use analysis::proximity::*;
