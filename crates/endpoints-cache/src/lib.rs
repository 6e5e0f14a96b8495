//! # endpoints-cache
//!
//! In-memory cache of endpoint slices for service proxies.
//!
//! A service's backends arrive as several independently updated slices.
//! This crate keeps a minimal projection of each slice and, on demand,
//! merges them into a deterministic per-port endpoint list:
//!
//! - [`EndpointSliceCache`] - Shard store and endpoint map builder
//! - [`EndpointSliceCacheBuilder`] - Configures hostname, IP family, recorder and maker
//! - [`EventRecorder`] - Sink for diagnostic events raised while building maps
//! - [`CacheStats`] - Counters for monitoring
//!
//! ## Key Design Decisions
//!
//! - Slices are stored per service in a `DashMap`, so every update, delete or
//!   map build touches exactly one service under that entry's lock
//! - Map builds clone the slice `Arc`s and release the lock before merging
//! - Malformed records are skipped and reported, never surfaced as errors
//! - Endpoints are sorted by address so repeated builds are identical
//!
//! ## Example
//!
//! ```rust
//! use endpoints_cache::EndpointSliceCache;
//! use endpoints_core::{EndpointPort, EndpointSlice, IpFamily, ServiceKey, SliceEndpoint};
//!
//! let cache = EndpointSliceCache::new("node-1", IpFamily::Any);
//!
//! cache.update(
//!     &EndpointSlice::new("web-1", "default")
//!         .owned_by_service("web")
//!         .with_port(EndpointPort::new("http", 80))
//!         .with_endpoint(SliceEndpoint::ready("10.0.0.2"))
//!         .with_endpoint(SliceEndpoint::ready("10.0.0.1")),
//! );
//!
//! let map = cache.get_endpoints_map(&ServiceKey::new("default", "web"));
//! let http = &map[&ServiceKey::new("default", "web").port("http")];
//! assert_eq!(http[0].to_string(), "10.0.0.1:80");
//! assert_eq!(http[1].to_string(), "10.0.0.2:80");
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cache;
mod events;
mod locality;
mod slice_info;
mod stats;

pub use cache::{CacheConfig, EndpointSliceCache, EndpointSliceCacheBuilder, EndpointsMap};
pub use events::{ChannelRecorder, EventRecorder, IncorrectIpVersion, NoopRecorder};
pub use locality::{is_local, HOSTNAME_TOPOLOGY_KEY};
pub use slice_info::{cache_keys, EndpointInfo, EndpointSliceInfo};
pub use stats::CacheStats;
