//! # endpoints-core
//!
//! Core types, traits, and error handling for the endpoint slice cache.
//!
//! This crate provides the foundational types used across the other crates:
//!
//! - [`EndpointSlice`] - The sharded input record describing a service's backends
//! - [`ServiceKey`] / [`ServicePortName`] - Service and per-port aggregation keys
//! - [`IpFamily`] - Address-family filter applied when building endpoint maps
//! - [`Endpoint`] - Read contract for materialized endpoints
//! - [`EndpointMaker`] - Extension hook that enriches materialized endpoints
//! - [`EndpointsError`] - Error type for the few fallible edges
//!
//! ## Example
//!
//! ```rust
//! use endpoints_core::{BaseEndpointInfo, Endpoint, IpFamily, ServiceKey};
//!
//! let service: ServiceKey = "default/web".parse().unwrap();
//! assert_eq!(service.name, "web");
//!
//! let ep = BaseEndpointInfo::new("10.0.1.1", 80, false);
//! assert_eq!(ep.endpoint(), "10.0.1.1:80");
//!
//! assert!(IpFamily::V4.admits("10.0.1.1"));
//! assert!(!IpFamily::V6.admits("10.0.1.1"));
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![warn(missing_docs)]

mod discovery;
mod endpoint;
mod error;
mod ip_family;
mod service;

pub use discovery::{
    Endpoint as SliceEndpoint, EndpointConditions, EndpointPort, EndpointSlice, ObjectMeta,
    ObjectReference, OwnerReference, Protocol, TargetType,
};
pub use endpoint::{BaseEndpointInfo, BaseEndpointMaker, Endpoint, EndpointMaker};
pub use error::EndpointsError;
pub use ip_family::{is_ipv6_str, IpFamily};
pub use service::{ServiceKey, ServicePortName};

/// Result type alias using [`EndpointsError`].
pub type Result<T> = std::result::Result<T, EndpointsError>;
