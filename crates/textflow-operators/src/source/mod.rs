//! Source operators: no inputs, tuples read from a named data set.

pub mod keyword;
pub mod scan;

pub use keyword::{KeywordSource, KeywordSourceConfig};
pub use scan::{ScanSource, ScanSourceConfig};
