pub mod http_probe;

pub use http_probe::{fetch_page, FetchedPage};
