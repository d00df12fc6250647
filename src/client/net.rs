//! Stream and datagram connection attempts against a single endpoint.

use crate::{Endpoint, Protocol};
use std::{
    future::Future,
    io,
    net::{Ipv4Addr, Ipv6Addr, SocketAddr},
    time::Duration,
};
use tokio::net::{lookup_host, TcpSocket, TcpStream, UdpSocket};

/// An open connection to a SRV-located endpoint.
#[derive(Debug)]
pub enum Connection {
    /// Stream connection.
    Tcp(TcpStream),
    /// Datagram socket connected to its peer.
    Udp(UdpSocket),
}

impl Connection {
    /// Transport protocol of the connection.
    pub fn protocol(&self) -> Protocol {
        match self {
            Connection::Tcp(_) => Protocol::Tcp,
            Connection::Udp(_) => Protocol::Udp,
        }
    }

    /// Address of the remote peer.
    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        match self {
            Connection::Tcp(stream) => stream.peer_addr(),
            Connection::Udp(socket) => socket.peer_addr(),
        }
    }

    /// Local address the connection is bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        match self {
            Connection::Tcp(stream) => stream.local_addr(),
            Connection::Udp(socket) => socket.local_addr(),
        }
    }
}

/// Connects to `endpoint` with whichever transport its protocol names.
pub(crate) async fn connect(
    endpoint: Endpoint,
    timeout: Option<Duration>,
) -> io::Result<Connection> {
    match endpoint.protocol() {
        Protocol::Tcp => connect_tcp(endpoint, None, timeout)
            .await
            .map(Connection::Tcp),
        Protocol::Udp => connect_udp(endpoint, None, timeout)
            .await
            .map(Connection::Udp),
    }
}

/// Resolves `endpoint` and opens a stream to it, bound to `local` if given.
pub(crate) async fn connect_tcp(
    endpoint: Endpoint,
    local: Option<SocketAddr>,
    timeout: Option<Duration>,
) -> io::Result<TcpStream> {
    within(timeout, async {
        let remote = resolve(&endpoint, local).await?;
        let socket = if remote.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        if let Some(local) = local {
            socket.bind(local)?;
        }
        socket.connect(remote).await
    })
    .await
}

/// Resolves `endpoint` and connects a datagram socket to it, bound to `local`
/// if given or to an ephemeral port otherwise.
pub(crate) async fn connect_udp(
    endpoint: Endpoint,
    local: Option<SocketAddr>,
    timeout: Option<Duration>,
) -> io::Result<UdpSocket> {
    within(timeout, async {
        let remote = resolve(&endpoint, local).await?;
        let local = local.unwrap_or_else(|| match remote {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        });
        let socket = UdpSocket::bind(local).await?;
        socket.connect(remote).await?;
        Ok(socket)
    })
    .await
}

/// Looks up the socket address to use for `endpoint`: one matching the
/// address family of `local` when binding, preferring IPv4 otherwise.
async fn resolve(endpoint: &Endpoint, local: Option<SocketAddr>) -> io::Result<SocketAddr> {
    let addrs: Vec<SocketAddr> = lookup_host((endpoint.host(), endpoint.port()))
        .await?
        .collect();

    let chosen = match local {
        Some(local) => addrs.iter().find(|a| a.is_ipv4() == local.is_ipv4()),
        None => addrs.iter().find(|a| a.is_ipv4()).or_else(|| addrs.first()),
    };

    #[cfg(feature = "log")]
    tracing::trace!(%endpoint, ?addrs, ?chosen, "resolved endpoint");

    chosen.copied().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("no suitable address for {endpoint}"),
        )
    })
}

async fn within<T>(
    timeout: Option<Duration>,
    attempt: impl Future<Output = io::Result<T>>,
) -> io::Result<T> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, attempt)
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "connection attempt timed out"))?,
        None => attempt.await,
    }
}
