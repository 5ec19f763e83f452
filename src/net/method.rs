//! HTTP verb constants for [`RequestOptions::method`](crate::net::RequestOptions::method).
//!
//! Any string is accepted as a method; these only save typing. `http::Method` works too since it
//! implements `AsRef<str>`.
pub use http::Method;

pub const GET: &str = "GET";
pub const HEAD: &str = "HEAD";
pub const POST: &str = "POST";
pub const PUT: &str = "PUT";
pub const PATCH: &str = "PATCH";
pub const DELETE: &str = "DELETE";
pub const CONNECT: &str = "CONNECT";
pub const OPTIONS: &str = "OPTIONS";
pub const TRACE: &str = "TRACE";
