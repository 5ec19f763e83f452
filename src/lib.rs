pub mod config;
pub mod errors;
pub mod net;

pub use errors::FetchError;
pub use net::{fetch, Fetcher, RequestOptions, Response};
