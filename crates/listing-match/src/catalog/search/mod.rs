//! Multi-criteria search over a snapshot of listings.

mod criteria;
mod pipeline;

pub use criteria::{Bounds, FilterCriteria, SearchParams, SortKey};
pub use pipeline::{filter_and_sort, sort_listings};

pub(crate) use pipeline::contains_ignore_case;
