//! Remote inventory provider backed by the GitHub search API.

pub mod client;
pub mod error;
pub mod link;
pub mod model;

pub use client::{GithubClient, HttpResponse, Transport, UreqTransport, TOKEN_ENV};
pub use error::GithubError;
pub use model::{Protocol, SearchItem, SearchPage};
