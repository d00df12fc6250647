//! SRV resolver backed by [`hickory_resolver`].

use super::SrvResolver;
use crate::SrvRecord;
use async_trait::async_trait;
use hickory_resolver::{
    name_server::ConnectionProvider, proto::rr::rdata::SRV, Name, ResolveError, Resolver,
};

#[async_trait]
impl<P> SrvResolver for Resolver<P>
where
    P: ConnectionProvider,
{
    type Record = SRV;
    type Error = ResolveError;

    async fn get_srv_records_unordered(&self, srv: &str) -> Result<Vec<Self::Record>, Self::Error> {
        match self.srv_lookup(srv).await {
            Ok(lookup) => Ok(lookup.into_iter().collect()),
            // The name exists but publishes no SRV records.
            Err(e) if e.is_no_records_found() && !e.is_nx_domain() => {
                #[cfg(feature = "log")]
                tracing::debug!(srv, "SRV lookup returned no records");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}

impl SrvRecord for SRV {
    type Target = Name;

    fn target(&self) -> &Self::Target {
        self.target()
    }

    fn port(&self) -> u16 {
        self.port()
    }

    fn priority(&self) -> u16 {
        self.priority()
    }

    fn weight(&self) -> u16 {
        self.weight()
    }
}
