pub mod executor;
pub mod fetch;

pub use executor::{Completion, FetchExecutor};
pub use fetch::{LoadMore, PageFetcher, PageRequest};
