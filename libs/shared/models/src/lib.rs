pub mod records;
pub mod weekdays;

pub use records::*;
