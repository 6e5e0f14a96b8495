//! Materialized endpoints and the hook that enriches them.
//!
//! The cache builds a [`BaseEndpointInfo`] for every surviving endpoint and
//! hands it to an [`EndpointMaker`]. Proxies that keep per-endpoint state
//! (connection counters, health marks) supply their own maker and get their
//! own type back in the endpoint map; everyone else uses
//! [`BaseEndpointMaker`], which passes the base record through unchanged.

use std::fmt;
use std::sync::Arc;

/// Read contract for a materialized endpoint.
///
/// # Example
///
/// ```rust
/// use endpoints_core::{BaseEndpointInfo, Endpoint};
///
/// #[derive(Debug)]
/// struct Tracked {
///     base: BaseEndpointInfo,
///     active_connections: u64,
/// }
///
/// impl Endpoint for Tracked {
///     fn endpoint(&self) -> &str {
///         self.base.endpoint()
///     }
///
///     fn ip(&self) -> &str {
///         self.base.ip()
///     }
///
///     fn port(&self) -> u16 {
///         self.base.port()
///     }
///
///     fn is_local(&self) -> bool {
///         self.base.is_local()
///     }
/// }
/// ```
pub trait Endpoint {
    /// The `address:port` form, with IPv6 addresses bracketed.
    fn endpoint(&self) -> &str;

    /// The raw address, without the port.
    fn ip(&self) -> &str;

    /// The port number.
    fn port(&self) -> u16;

    /// Whether the endpoint runs on the same node as this proxy.
    fn is_local(&self) -> bool;
}

impl<E: Endpoint + ?Sized> Endpoint for Arc<E> {
    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }

    fn ip(&self) -> &str {
        (**self).ip()
    }

    fn port(&self) -> u16 {
        (**self).port()
    }

    fn is_local(&self) -> bool {
        (**self).is_local()
    }
}

/// The endpoint record the cache builds before any enrichment.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BaseEndpointInfo {
    endpoint: String,
    ip: String,
    port: u16,
    is_local: bool,
}

impl BaseEndpointInfo {
    /// Create a new endpoint record.
    #[must_use]
    pub fn new(ip: impl Into<String>, port: u16, is_local: bool) -> Self {
        let ip = ip.into();
        Self {
            endpoint: join_host_port(&ip, port),
            ip,
            port,
            is_local,
        }
    }
}

impl Endpoint for BaseEndpointInfo {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn ip(&self) -> &str {
        &self.ip
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn is_local(&self) -> bool {
        self.is_local
    }
}

impl fmt::Display for BaseEndpointInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.endpoint)
    }
}

fn join_host_port(host: &str, port: u16) -> String {
    if host.contains(':') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

/// Transform applied to every endpoint the cache materializes.
///
/// Implementations must keep the address, port and locality of the record
/// they are given; the cache deduplicates on those after the transform.
///
/// Any `Fn(BaseEndpointInfo) -> E` closure is a maker:
///
/// ```rust
/// use endpoints_core::{BaseEndpointInfo, EndpointMaker};
/// use std::sync::Arc;
///
/// let maker = |base: BaseEndpointInfo| Arc::new(base);
/// let ep = maker.make(BaseEndpointInfo::new("10.0.0.1", 80, true));
/// assert_eq!(ep.to_string(), "10.0.0.1:80");
/// ```
pub trait EndpointMaker {
    /// The enriched endpoint type.
    type Endpoint: Endpoint;

    /// Build the final endpoint from the base record.
    fn make(&self, base: BaseEndpointInfo) -> Self::Endpoint;
}

impl<F, E> EndpointMaker for F
where
    F: Fn(BaseEndpointInfo) -> E,
    E: Endpoint,
{
    type Endpoint = E;

    fn make(&self, base: BaseEndpointInfo) -> E {
        self(base)
    }
}

/// The identity maker.
#[derive(Clone, Copy, Debug, Default)]
pub struct BaseEndpointMaker;

impl EndpointMaker for BaseEndpointMaker {
    type Endpoint = BaseEndpointInfo;

    #[inline]
    fn make(&self, base: BaseEndpointInfo) -> BaseEndpointInfo {
        base
    }
}
