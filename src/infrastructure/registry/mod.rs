//! Source registry implementations

mod http;

pub use http::HttpSourceRegistry;
