//! Cached projection of an endpoint slice.
//!
//! Only the attributes the map builder needs are kept, to limit memory use
//! on large clusters.

use std::collections::BTreeMap;

use endpoints_core::{EndpointPort, EndpointSlice, ServiceKey};

/// The part of a slice the cache keeps.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EndpointSliceInfo {
    /// Declared ports, unmodified.
    pub ports: Vec<EndpointPort>,
    /// Endpoints that were ready when the slice was stored.
    pub endpoints: Vec<EndpointInfo>,
}

/// The part of an endpoint the cache keeps.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EndpointInfo {
    /// Target addresses. The first one is the one that gets traffic.
    pub targets: Vec<String>,
    /// Topology labels.
    pub topology: BTreeMap<String, String>,
}

impl EndpointSliceInfo {
    /// Project a slice, dropping endpoints that are not ready.
    pub fn from_slice(slice: &EndpointSlice) -> Self {
        Self {
            ports: slice.ports.clone(),
            endpoints: slice
                .endpoints
                .iter()
                .filter(|endpoint| endpoint.conditions.ready)
                .map(|endpoint| EndpointInfo {
                    targets: endpoint.targets.clone(),
                    topology: endpoint.topology.clone(),
                })
                .collect(),
        }
    }
}

/// Derive the service key and slice key a slice is stored under.
///
/// The service comes from the slice's first owner reference. A slice
/// without one is filed under [`ServiceKey::default()`], which no real
/// service lookup reaches.
pub fn cache_keys(slice: &EndpointSlice) -> (ServiceKey, String) {
    let service = match slice.owner_name() {
        Some(owner) => ServiceKey::new(slice.namespace(), owner),
        None => ServiceKey::default(),
    };
    (service, slice.name().to_string())
}
