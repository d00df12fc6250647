#![deny(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

/*!
Rust client for connecting to services located by DNS SRV records.

# Introduction

SRV Records, as defined in [RFC 2782](https://tools.ietf.org/html/rfc2782),
are DNS records of the form

`_Service._Proto.Name TTL Class SRV Priority Weight Port Target`

For instance, a DNS server might respond with the following SRV records for
`_xmpp-client._tcp.example.com`:

```text
_xmpp-client._tcp.example.com. 60 IN SRV 1 100 5222 xmpp1.example.com.
_xmpp-client._tcp.example.com. 60 IN SRV 2 50  5222 xmpp2.example.com.
_xmpp-client._tcp.example.com. 60 IN SRV 2 50  5222 xmpp3.example.com.
```

A client wanting to communicate with this example service would first try to
connect to `xmpp1.example.com:5222` (the record with the lowest priority),
then to the other two (in a random order, since they are of the same
priority) should the first be unavailable.

`srv-dial` handles the lookup of SRV records, the ordering of their targets
and the connection attempts against them:

```
# async fn run() -> Result<(), Box<dyn std::error::Error>> {
use srv_dial::{Protocol, SrvClient};
let client = SrvClient::from_system_conf()?;
let stream = client.dial_tcp(None, "example.com:xmpp-client").await?;
let socket = client.dial_udp(None, "example.com:stun").await?;
let conn = client.dial_srv("xmpp-client", Protocol::Tcp, "example.com").await?;
# Ok(())
# }
```

Targets are attempted one at a time. The first successful connection is
returned; if every target fails, [`Error::AllCandidatesFailed`] lists each
target together with the reason it failed.

# Alternative Resolvers and Connection Attempts

The resolver used for SRV lookup can be replaced by implementing the
[`SrvResolver`] trait. Connection attempts can be customised with
[`SrvClient::dial_with`], or by calling [`failover::connect`] directly on
endpoints obtained from [`SrvClient::lookup`] or any other source.

The provided resolver backends are enabled by the following features:

- `hickory` (via [`hickory_resolver::Resolver`])

[`SrvResolver`]: resolver::SrvResolver
*/

mod client;
pub use client::{failover, Connection, Error, SrvClient};

mod endpoint;
pub use endpoint::{split_address, Endpoint, ParseProtocolError, Protocol};

mod order;
pub use order::order_srv_records;

mod record;
pub use record::{OwnedSrvRecord, SrvRecord};

pub mod resolver;
