//! # nebucloud-endpoints
//!
//! Endpoint slice aggregation for service proxies.
//!
//! A proxy's control loop feeds slice add/update/delete notifications into
//! an [`EndpointSliceCache`](cache::EndpointSliceCache) and, before
//! regenerating its rules for a service, asks the cache for the merged,
//! deduplicated, sorted endpoint list of every port of that service.
//!
//! ## Quick Start
//!
//! ```rust
//! use nebucloud_endpoints::prelude::*;
//!
//! let cache = EndpointSliceCache::new("node-1", IpFamily::V4);
//!
//! cache.update(
//!     &EndpointSlice::new("web-a", "default")
//!         .owned_by_service("web")
//!         .with_port(EndpointPort::new("http", 8080))
//!         .with_endpoint(SliceEndpoint::ready("10.0.0.1").with_topology(HOSTNAME_TOPOLOGY_KEY, "node-1"))
//!         .with_endpoint(SliceEndpoint::not_ready("10.0.0.2")),
//! );
//!
//! let web = ServiceKey::new("default", "web");
//! let map = cache.get_endpoints_map(&web);
//! let http = &map[&web.port("http")];
//!
//! assert_eq!(http.len(), 1);
//! assert_eq!(http[0].endpoint(), "10.0.0.1:8080");
//! assert!(http[0].is_local());
//! ```
//!
//! ## Architecture
//!
//! - `endpoints-core` - Slice records, service keys, endpoint contract, errors
//! - `endpoints-cache` - Slice store, endpoint map builder, event recorders
//!
//! This crate re-exports both for convenience.
//!
//! ## Design Principles
//!
//! 1. **Never fail the build** - Malformed records are skipped and reported
//! 2. **Deterministic output** - Same slices, same map, byte for byte
//! 3. **Per-service locking** - Updates and builds on a service never interleave
//! 4. **Pluggable endpoints** - Proxies attach their own state via `EndpointMaker`

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub use endpoints_cache as cache;
pub use endpoints_core as core;

/// Prelude module for convenient imports.
///
/// ```rust
/// use nebucloud_endpoints::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use endpoints_core::{
        BaseEndpointInfo, BaseEndpointMaker, Endpoint, EndpointMaker, EndpointPort,
        EndpointSlice, EndpointsError, IpFamily, Protocol, ServiceKey, ServicePortName,
        SliceEndpoint,
    };

    // Cache types
    pub use endpoints_cache::{
        cache_keys, CacheConfig, CacheStats, ChannelRecorder, EndpointSliceCache,
        EndpointSliceCacheBuilder, EndpointsMap, EventRecorder, IncorrectIpVersion,
        NoopRecorder, HOSTNAME_TOPOLOGY_KEY,
    };
}

/// Version information for this crate.
pub mod version {
    /// Crate version.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// Get version info as a string.
    pub fn version_string() -> String {
        format!("nebucloud-endpoints {VERSION}")
    }
}
