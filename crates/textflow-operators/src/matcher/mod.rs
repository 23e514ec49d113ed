//! Single-input matchers: pass through the tuples whose target attributes
//! match, subject to pagination.

pub mod keyword;
pub mod regex;

pub use self::keyword::{
    tokenize, KeywordMatcher, KeywordMatcherConfig, KeywordMatchingType, KeywordPredicate,
    UnknownMatchingType,
};
pub use self::regex::{RegexMatcher, RegexMatcherConfig};
