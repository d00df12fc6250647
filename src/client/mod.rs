//! Clients based on SRV lookups.

use crate::{
    endpoint::split_address,
    resolver::{srv_name, SrvResolver},
    Endpoint, Protocol, SrvRecord,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{
    fmt::{Debug, Display},
    future::Future,
    io,
    net::SocketAddr,
    time::Duration,
};
use tokio::net::{TcpStream, UdpSocket};

/// Ordered connection attempts with failover.
pub mod failover;
use failover::{DialError, Failures};

mod net;
pub use net::Connection;

/// Errors encountered by a [`SrvClient`].
#[derive(Debug, thiserror::Error)]
pub enum Error<Lookup: std::error::Error + 'static, Attempt: Debug + Display = io::Error> {
    /// The address was not of the form `domain:service`
    #[error("address {0:?} is not of the form domain:service")]
    InvalidAddressFormat(String),
    /// SRV lookup errors
    #[error("SRV lookup error")]
    Lookup(#[source] Lookup),
    /// Produced when a lookup succeeds but yields no SRV records
    #[error("no SRV targets to use")]
    NoCandidates,
    /// Every SRV target was attempted and none could be connected to
    #[error("{0}")]
    AllCandidatesFailed(Failures<Attempt>),
}

impl<Lookup, Attempt> From<DialError<Attempt>> for Error<Lookup, Attempt>
where
    Lookup: std::error::Error + 'static,
    Attempt: Debug + Display,
{
    fn from(err: DialError<Attempt>) -> Self {
        match err {
            DialError::NoCandidates => Error::NoCandidates,
            DialError::AllCandidatesFailed(failures) => Error::AllCandidatesFailed(failures),
        }
    }
}

/// Client for connecting to services located by SRV records.
///
/// # Usage
///
/// A client wraps a [`SrvResolver`]. Services are named either by a combined
/// `domain:service` address ([`lookup`], [`dial`], [`dial_tcp`],
/// [`dial_udp`]) or by their parts ([`lookup_srv`], [`dial_srv`]).
///
/// Each call resolves afresh; nothing is cached between calls. Candidates
/// are attempted one after another in RFC 2782 order, and the first
/// successful connection is returned.
///
/// ## Timeouts
///
/// By default an attempt runs for as long as the operating system lets it.
/// [`SrvClient::attempt_timeout`] bounds each individual attempt made by the
/// provided dialers.
///
/// [`lookup`]: SrvClient::lookup()
/// [`lookup_srv`]: SrvClient::lookup_srv()
/// [`dial`]: SrvClient::dial()
/// [`dial_srv`]: SrvClient::dial_srv()
/// [`dial_tcp`]: SrvClient::dial_tcp()
/// [`dial_udp`]: SrvClient::dial_udp()
#[derive(Debug)]
pub struct SrvClient<Resolver> {
    resolver: Resolver,
    attempt_timeout: Option<Duration>,
}

impl<Resolver> SrvClient<Resolver> {
    /// Creates a new client resolving SRV records with `resolver`.
    pub fn new(resolver: Resolver) -> Self {
        Self {
            resolver,
            attempt_timeout: None,
        }
    }

    /// Sets the resolver of the client.
    pub fn resolver<R>(self, resolver: R) -> SrvClient<R> {
        SrvClient {
            resolver,
            attempt_timeout: self.attempt_timeout,
        }
    }

    /// Sets the time limit for each individual connection attempt.
    pub fn attempt_timeout(self, attempt_timeout: Duration) -> Self {
        Self {
            attempt_timeout: Some(attempt_timeout),
            ..self
        }
    }
}

#[cfg(feature = "hickory")]
impl SrvClient<hickory_resolver::TokioResolver> {
    /// Creates a new client using the system's resolver configuration.
    pub fn from_system_conf() -> Result<Self, hickory_resolver::ResolveError> {
        Ok(Self::new(hickory_resolver::Resolver::builder_tokio()?.build()))
    }
}

impl<Resolver: SrvResolver> SrvClient<Resolver> {
    /// Resolves a `domain:service` address into endpoints, sorted by priority
    /// and randomized by weight within a priority.
    pub async fn lookup(
        &self,
        protocol: Protocol,
        address: &str,
    ) -> Result<Vec<Endpoint>, Error<Resolver::Error>> {
        self.lookup_with_rng(protocol, address, &mut StdRng::from_os_rng())
            .await
    }

    /// Like [`SrvClient::lookup`], drawing weighted choices from `rng`.
    pub async fn lookup_with_rng<G>(
        &self,
        protocol: Protocol,
        address: &str,
        rng: &mut G,
    ) -> Result<Vec<Endpoint>, Error<Resolver::Error>>
    where
        G: Rng + Send + ?Sized,
    {
        self.resolve_address(protocol, address, rng).await
    }

    /// Resolves `_service._protocol.domain` into endpoints, sorted by priority
    /// and randomized by weight within a priority.
    ///
    /// An empty `service` queries `domain` as the full SRV owner name.
    pub async fn lookup_srv(
        &self,
        service: &str,
        protocol: Protocol,
        domain: &str,
    ) -> Result<Vec<Endpoint>, Error<Resolver::Error>> {
        self.lookup_srv_with_rng(service, protocol, domain, &mut StdRng::from_os_rng())
            .await
    }

    /// Like [`SrvClient::lookup_srv`], drawing weighted choices from `rng`.
    pub async fn lookup_srv_with_rng<G>(
        &self,
        service: &str,
        protocol: Protocol,
        domain: &str,
        rng: &mut G,
    ) -> Result<Vec<Endpoint>, Error<Resolver::Error>>
    where
        G: Rng + Send + ?Sized,
    {
        self.resolve_srv(service, protocol, domain, rng).await
    }

    async fn resolve_address<G, A>(
        &self,
        protocol: Protocol,
        address: &str,
        rng: &mut G,
    ) -> Result<Vec<Endpoint>, Error<Resolver::Error, A>>
    where
        G: Rng + Send + ?Sized,
        A: Debug + Display,
    {
        let Some((domain, service)) = split_address(address) else {
            return Err(Error::InvalidAddressFormat(address.to_owned()));
        };
        self.resolve_srv(service, protocol, domain, rng).await
    }

    async fn resolve_srv<G, A>(
        &self,
        service: &str,
        protocol: Protocol,
        domain: &str,
        rng: &mut G,
    ) -> Result<Vec<Endpoint>, Error<Resolver::Error, A>>
    where
        G: Rng + Send + ?Sized,
        A: Debug + Display,
    {
        let srv = srv_name(service, protocol, domain);
        let records = match self.resolver.get_srv_records(&srv, rng).await {
            Ok(records) => records,
            Err(e) => {
                #[cfg(feature = "log")]
                tracing::debug!(%srv, error = %e, "SRV lookup failed");
                return Err(Error::Lookup(e));
            }
        };

        if records.is_empty() {
            #[cfg(feature = "log")]
            tracing::debug!(%srv, "SRV lookup yielded no records");
            return Err(Error::NoCandidates);
        }

        let endpoints: Vec<Endpoint> = records
            .iter()
            .map(|record| record.to_endpoint(protocol))
            .collect();

        #[cfg(feature = "log")]
        tracing::debug!(%srv, candidates = endpoints.len(), "resolved SRV candidates");

        Ok(endpoints)
    }

    /// Resolves a `domain:service` address and connects to the first
    /// reachable endpoint.
    pub async fn dial(
        &self,
        protocol: Protocol,
        address: &str,
    ) -> Result<Connection, Error<Resolver::Error>> {
        let timeout = self.attempt_timeout;
        self.dial_with(protocol, address, |endpoint| net::connect(endpoint, timeout))
            .await
    }

    /// Resolves `_service._protocol.domain` and connects to the first
    /// reachable endpoint.
    pub async fn dial_srv(
        &self,
        service: &str,
        protocol: Protocol,
        domain: &str,
    ) -> Result<Connection, Error<Resolver::Error>> {
        let timeout = self.attempt_timeout;
        let candidates = self.lookup_srv(service, protocol, domain).await?;
        Ok(failover::connect(candidates, |endpoint| net::connect(endpoint, timeout)).await?)
    }

    /// Resolves a `domain:service` address over TCP and opens a stream to the
    /// first reachable endpoint, bound to `local_addr` if given.
    pub async fn dial_tcp(
        &self,
        local_addr: Option<SocketAddr>,
        address: &str,
    ) -> Result<TcpStream, Error<Resolver::Error>> {
        let timeout = self.attempt_timeout;
        self.dial_with(Protocol::Tcp, address, |endpoint| {
            net::connect_tcp(endpoint, local_addr, timeout)
        })
        .await
    }

    /// Resolves a `domain:service` address over UDP and connects a datagram
    /// socket to the first reachable endpoint, bound to `local_addr` if given.
    pub async fn dial_udp(
        &self,
        local_addr: Option<SocketAddr>,
        address: &str,
    ) -> Result<UdpSocket, Error<Resolver::Error>> {
        let timeout = self.attempt_timeout;
        self.dial_with(Protocol::Udp, address, |endpoint| {
            net::connect_udp(endpoint, local_addr, timeout)
        })
        .await
    }

    /// Resolves a `domain:service` address and performs `attempt` on each
    /// endpoint in order, producing the first success or every failure.
    pub async fn dial_with<C, E, Fut>(
        &self,
        protocol: Protocol,
        address: &str,
        attempt: impl FnMut(Endpoint) -> Fut,
    ) -> Result<C, Error<Resolver::Error, E>>
    where
        E: Debug + Display,
        Fut: Future<Output = Result<C, E>>,
    {
        let candidates = self
            .resolve_address::<_, E>(protocol, address, &mut StdRng::from_os_rng())
            .await?;
        Ok(failover::connect(candidates, attempt).await?)
    }
}
