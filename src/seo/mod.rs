//! Rule-based SEO scoring.
//!
//! [`score_page`] is a pure function over extraction results. It never fails:
//! absent inventories count as empty.

mod scoring;

pub use scoring::{score_page, Grade, SeoReport};
