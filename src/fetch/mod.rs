//! HTTP plumbing for the geocoding service.

mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use reqwest::Url;

/// Sends a GET for `url` and returns the body.
///
/// Non-success statuses are turned into errors.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: Url) -> reqwest::Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}
