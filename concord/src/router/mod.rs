pub mod merge;
pub mod report;
pub mod util;
