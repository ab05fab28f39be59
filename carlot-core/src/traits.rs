//! Core trait definitions

use crate::error::CarlotResult;
use crate::types::{Listing, NewListing};
use async_trait::async_trait;

/// Listing storage.
///
/// Implementations must bind every user-supplied value as a query parameter.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Listings whose make, model, year, price or description contain `term`
    /// (case-insensitive). A blank term returns every listing. Results are in
    /// insertion order.
    async fn search(&self, term: &str) -> CarlotResult<Vec<Listing>>;

    /// Store a listing and return its assigned id
    async fn insert(&self, listing: &NewListing) -> CarlotResult<i64>;

    /// Number of stored listings
    async fn count(&self) -> CarlotResult<i64>;
}
