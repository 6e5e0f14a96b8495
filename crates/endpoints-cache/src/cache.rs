//! Endpoint slice cache and endpoint map builder.
//!
//! The cache stores a projection of every slice, keyed by the service that
//! owns it and the slice's own name. [`EndpointSliceCache::get_endpoints_map`]
//! merges all slices of one service into a per-port endpoint list.

use std::collections::hash_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use endpoints_core::{
    BaseEndpointInfo, BaseEndpointMaker, Endpoint, EndpointMaker, EndpointPort, EndpointSlice,
    IpFamily, ServiceKey, ServicePortName,
};
use fnv::{FnvHashMap, FnvHashSet};
use tracing::{debug, error, trace, warn};

use crate::events::{EventRecorder, IncorrectIpVersion};
use crate::locality::is_local;
use crate::slice_info::{cache_keys, EndpointSliceInfo};
use crate::stats::CacheStats;

/// Endpoints of a service, per port, sorted by address.
///
/// Ports without any surviving endpoint have no entry.
pub type EndpointsMap<E = BaseEndpointInfo> = BTreeMap<ServicePortName, Vec<E>>;

/// Slices of one service, keyed by slice name.
type SliceSet = BTreeMap<String, Arc<EndpointSliceInfo>>;

/// Field name reported in IP family events.
const SLICE_FIELD: &str = "endpointslice";

/// Cache configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Name of the node this proxy runs on. Empty disables locality.
    pub hostname: String,
    /// Address family the proxy programs.
    pub ip_family: IpFamily,
    /// Initial number of services to allocate for.
    pub initial_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            hostname: String::new(),
            ip_family: IpFamily::Any,
            initial_capacity: 64,
        }
    }
}

/// Cache of endpoint slices, merged on demand into endpoint maps.
///
/// ## Thread Safety
///
/// Slices are held in a `DashMap` keyed by service. [`update`](Self::update)
/// and [`delete`](Self::delete) modify one service under that entry's write
/// lock; [`get_endpoints_map`](Self::get_endpoints_map) copies one
/// service's slice set under its read lock and merges after releasing it.
/// Operations on the same service are therefore serialized, and a map is
/// always built from a consistent set of slices.
///
/// ## Extension
///
/// The `M` parameter is the [`EndpointMaker`] applied to every endpoint the
/// map builder emits. The default keeps [`BaseEndpointInfo`].
pub struct EndpointSliceCache<M = BaseEndpointMaker> {
    slices_by_service: DashMap<ServiceKey, SliceSet>,
    hostname: String,
    ip_family: IpFamily,
    recorder: Option<Arc<dyn EventRecorder>>,
    maker: M,
    stats: CacheStats,
}

impl Default for EndpointSliceCache {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl EndpointSliceCache {
    /// Create a cache for a proxy on `hostname` programming `ip_family`.
    pub fn new(hostname: impl Into<String>, ip_family: IpFamily) -> Self {
        Self::builder()
            .hostname(hostname)
            .ip_family(ip_family)
            .build()
    }

    /// Create a cache builder.
    pub fn builder() -> EndpointSliceCacheBuilder {
        EndpointSliceCacheBuilder::new()
    }
}

impl<M> EndpointSliceCache<M> {
    /// Store a slice, replacing any previous version with the same name.
    ///
    /// Endpoints that are not ready are dropped here and never reconsidered.
    pub fn update(&self, slice: &EndpointSlice) {
        let (service, name) = cache_keys(slice);
        let info = Arc::new(EndpointSliceInfo::from_slice(slice));

        if service.is_empty() {
            debug!(
                slice = %name,
                namespace = slice.namespace(),
                "slice has no owner reference, storing under empty service key"
            );
        }

        debug!(
            service = %service,
            slice = %name,
            ports = info.ports.len(),
            ready_endpoints = info.endpoints.len(),
            "updated endpoint slice"
        );

        self.slices_by_service
            .entry(service)
            .or_default()
            .insert(name, info);
        self.stats.record_update();
    }

    /// Remove a slice. Removing an unknown slice is a no-op.
    pub fn delete(&self, slice: &EndpointSlice) {
        let (service, name) = cache_keys(slice);

        // The entry guard is released inside the closure, before remove_if
        // takes the same shard lock again.
        let removed = self
            .slices_by_service
            .get_mut(&service)
            .is_some_and(|mut slices| slices.remove(&name).is_some());

        if removed {
            self.slices_by_service
                .remove_if(&service, |_, slices| slices.is_empty());
            self.stats.record_delete();
            debug!(service = %service, slice = %name, "deleted endpoint slice");
        }
    }

    /// Number of services with at least one stored slice.
    pub fn service_count(&self) -> usize {
        self.slices_by_service.len()
    }

    /// Number of slices stored for a service.
    pub fn slice_count(&self, service: &ServiceKey) -> usize {
        self.slices_by_service
            .get(service)
            .map(|slices| slices.len())
            .unwrap_or(0)
    }

    /// All services with stored slices, sorted.
    pub fn services(&self) -> Vec<ServiceKey> {
        let mut services: Vec<ServiceKey> = self
            .slices_by_service
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        services.sort();
        services
    }

    /// Name of the node this proxy runs on.
    #[inline]
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Address family the proxy programs.
    #[inline]
    pub fn ip_family(&self) -> IpFamily {
        self.ip_family
    }

    /// Get cache statistics.
    #[inline]
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    fn slices_for(&self, service: &ServiceKey) -> Vec<(String, Arc<EndpointSliceInfo>)> {
        // Clone the Arcs and drop the read guard before merging.
        self.slices_by_service
            .get(service)
            .map(|slices| {
                slices
                    .iter()
                    .map(|(name, info)| (name.clone(), Arc::clone(info)))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn report_incorrect_ip_version(&self, service: &ServiceKey, slice: &str, address: &str) {
        let event = IncorrectIpVersion {
            service: service.clone(),
            address: address.to_string(),
            field: SLICE_FIELD,
            source: slice.to_string(),
        };

        error!(
            service = %service,
            slice = %slice,
            address = %address,
            ip_family = %self.ip_family,
            "{}",
            event.message()
        );

        if let Some(recorder) = &self.recorder {
            if let Err(err) = recorder.incorrect_ip_version(event) {
                self.stats.record_event_dropped();
                debug!(service = %service, error = %err, "failed to record event");
            }
        }
    }
}

impl<M: EndpointMaker> EndpointSliceCache<M> {
    /// Build the endpoint map for a service.
    ///
    /// Every port of every slice owned by the service contributes its ready
    /// endpoints. Endpoints are deduplicated per port by address, with a
    /// local endpoint winning over a remote one, and sorted by address.
    /// Invalid ports, endpoints without targets and endpoints of the wrong
    /// IP family are skipped. An unknown service yields an empty map.
    pub fn get_endpoints_map(&self, service: &ServiceKey) -> EndpointsMap<M::Endpoint> {
        self.stats.record_map_built();

        let slices = self.slices_for(service);
        if slices.is_empty() {
            trace!(service = %service, "no endpoint slices for service");
            return EndpointsMap::new();
        }

        let mut by_port: BTreeMap<ServicePortName, FnvHashMap<String, M::Endpoint>> =
            BTreeMap::new();
        let mut reported: FnvHashSet<&str> = FnvHashSet::default();

        for (slice_name, info) in &slices {
            for port in &info.ports {
                let Some(port_number) = valid_port(port) else {
                    warn!(
                        service = %service,
                        slice = %slice_name,
                        port = port.name(),
                        value = ?port.port,
                        "ignoring invalid endpoint port"
                    );
                    self.stats.record_invalid_port();
                    continue;
                };

                let endpoints = by_port.entry(service.port(port.name())).or_default();

                for endpoint in &info.endpoints {
                    let Some(address) = endpoint.targets.first() else {
                        warn!(
                            service = %service,
                            slice = %slice_name,
                            port = port.name(),
                            "ignoring invalid endpoint port with empty host"
                        );
                        self.stats.record_empty_endpoint();
                        continue;
                    };

                    if !self.ip_family.admits(address) {
                        self.stats.record_ip_family_mismatch();
                        if reported.insert(address.as_str()) {
                            self.report_incorrect_ip_version(service, slice_name, address);
                        }
                        continue;
                    }

                    let local = is_local(&self.hostname, &endpoint.topology);

                    match endpoints.entry(address.clone()) {
                        Entry::Vacant(slot) => {
                            let base = BaseEndpointInfo::new(address.as_str(), port_number, local);
                            slot.insert(self.maker.make(base));
                        }
                        Entry::Occupied(mut slot) => {
                            if local && !slot.get().is_local() {
                                let base =
                                    BaseEndpointInfo::new(address.as_str(), port_number, local);
                                slot.insert(self.maker.make(base));
                            }
                        }
                    }
                }
            }
        }

        let mut endpoints_map = EndpointsMap::new();
        for (port_name, endpoints) in by_port {
            if endpoints.is_empty() {
                continue;
            }

            let mut endpoints: Vec<M::Endpoint> = endpoints.into_values().collect();
            endpoints.sort_unstable_by(|a, b| a.ip().cmp(b.ip()));

            debug!(
                port = %port_name,
                endpoints = ?endpoints.iter().map(|e| e.endpoint()).collect::<Vec<_>>(),
                "setting endpoints"
            );

            endpoints_map.insert(port_name, endpoints);
        }

        endpoints_map
    }
}

impl<M> fmt::Debug for EndpointSliceCache<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointSliceCache")
            .field("services", &self.slices_by_service.len())
            .field("hostname", &self.hostname)
            .field("ip_family", &self.ip_family)
            .field("has_recorder", &self.recorder.is_some())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// A usable port number: present and in `1..=65535`.
fn valid_port(port: &EndpointPort) -> Option<u16> {
    port.port
        .and_then(|value| u16::try_from(value).ok())
        .filter(|value| *value != 0)
}

/// Builder for a configured cache.
pub struct EndpointSliceCacheBuilder<M = BaseEndpointMaker> {
    config: CacheConfig,
    recorder: Option<Arc<dyn EventRecorder>>,
    maker: M,
}

impl Default for EndpointSliceCacheBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EndpointSliceCacheBuilder {
    /// Create a new cache builder.
    pub fn new() -> Self {
        Self {
            config: CacheConfig::default(),
            recorder: None,
            maker: BaseEndpointMaker,
        }
    }
}

impl<M> EndpointSliceCacheBuilder<M> {
    /// Replace the whole configuration.
    pub fn config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the name of the node this proxy runs on.
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.config.hostname = hostname.into();
        self
    }

    /// Set the address family the proxy programs.
    pub fn ip_family(mut self, ip_family: IpFamily) -> Self {
        self.config.ip_family = ip_family;
        self
    }

    /// Set the initial service capacity.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.initial_capacity = capacity;
        self
    }

    /// Set the recorder for diagnostic events.
    pub fn recorder(mut self, recorder: impl EventRecorder + 'static) -> Self {
        self.recorder = Some(Arc::new(recorder));
        self
    }

    /// Set the transform applied to every materialized endpoint.
    pub fn endpoint_maker<N: EndpointMaker>(self, maker: N) -> EndpointSliceCacheBuilder<N> {
        EndpointSliceCacheBuilder {
            config: self.config,
            recorder: self.recorder,
            maker,
        }
    }

    /// Build the cache.
    pub fn build(self) -> EndpointSliceCache<M> {
        EndpointSliceCache {
            slices_by_service: DashMap::with_capacity(self.config.initial_capacity),
            hostname: self.config.hostname,
            ip_family: self.config.ip_family,
            recorder: self.recorder,
            maker: self.maker,
            stats: CacheStats::new(),
        }
    }
}

impl<M> fmt::Debug for EndpointSliceCacheBuilder<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointSliceCacheBuilder")
            .field("config", &self.config)
            .field("has_recorder", &self.recorder.is_some())
            .finish_non_exhaustive()
    }
}
