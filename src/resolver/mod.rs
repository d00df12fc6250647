//! SRV resolvers.

use crate::{endpoint::Protocol, order::order_srv_records, record::SrvRecord};
use async_trait::async_trait;
use rand::Rng;

#[cfg(feature = "hickory")]
pub mod hickory;

/// Represents the ability to act as a SRV resolver.
#[async_trait]
pub trait SrvResolver: Send + Sync {
    /// SRV record representation produced by the resolver.
    type Record: SrvRecord + Send;

    /// Errors encountered during SRV resolution.
    type Error: std::error::Error + Send + 'static;

    /// Gets the records corresponding to a srv name without sorting by priority
    /// or shuffling based on weight.
    ///
    /// A name that exists but carries no SRV records should produce an empty
    /// `Vec` rather than an error.
    async fn get_srv_records_unordered(&self, srv: &str) -> Result<Vec<Self::Record>, Self::Error>;

    /// Gets the records corresponding to a srv name, sorting by priority and
    /// shuffling based on weight using `rng`.
    async fn get_srv_records<G>(
        &self,
        srv: &str,
        rng: &mut G,
    ) -> Result<Vec<Self::Record>, Self::Error>
    where
        G: Rng + Send + ?Sized,
    {
        let records = self.get_srv_records_unordered(srv).await?;
        Ok(order_srv_records(records, rng))
    }
}

/// Builds the RFC 2782 owner name `_service._proto.domain.` to query.
///
/// An empty `service` means `domain` already is the full owner name, for
/// services published under non-standard names.
pub fn srv_name(service: &str, protocol: Protocol, domain: &str) -> String {
    let name = if service.is_empty() {
        domain.to_owned()
    } else {
        format!("_{service}._{protocol}.{domain}")
    };
    if name.ends_with('.') {
        name
    } else {
        name + "."
    }
}
