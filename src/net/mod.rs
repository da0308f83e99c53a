//! Network Module
//!
//! Request/response types exchanged between pages, the worker and the network,
//! plus the [`Fetcher`] seam the worker uses to reach the origin.

mod fetcher;
mod request;
mod response;

pub use fetcher::{Fetcher, HttpFetcher};
pub use request::{cache_key, FetchRequest};
pub use response::{FetchResponse, ResponseType};
