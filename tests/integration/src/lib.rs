//! Shared fixtures for the integration tests.

use std::sync::Once;

use nebucloud_endpoints::prelude::*;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Install a test subscriber, honouring `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Parameters for a generated slice.
///
/// Endpoint `i` (1-based) gets address `10.0.{offset}.{i}`, is ready unless
/// `i % unready_mod == 0`, and runs on `hosts[i % hosts.len()]` when hosts
/// are given. Ports are named `port-0`, `port-1`, ...
#[derive(Debug, Clone)]
pub struct SliceSpec<'a> {
    /// Owning service.
    pub service: &'a str,
    /// Namespace of the slice and service.
    pub namespace: &'a str,
    /// Suffix of the slice name.
    pub slice_num: u32,
    /// Third octet of the generated addresses.
    pub offset: u32,
    /// Number of endpoints.
    pub num_endpoints: u32,
    /// Every endpoint whose index is a multiple of this is not ready.
    pub unready_mod: u32,
    /// Node names assigned round-robin.
    pub hosts: &'a [&'a str],
    /// Port numbers.
    pub ports: &'a [i32],
}

impl<'a> SliceSpec<'a> {
    /// A spec with all endpoints ready, no hosts, and port 80.
    pub fn new(service: &'a str, namespace: &'a str, slice_num: u32, num_endpoints: u32) -> Self {
        Self {
            service,
            namespace,
            slice_num,
            offset: slice_num,
            num_endpoints,
            unready_mod: u32::MAX,
            hosts: &[],
            ports: &[80],
        }
    }

    /// Generate the slice.
    pub fn build(&self) -> EndpointSlice {
        let mut slice = EndpointSlice::new(format!("{}-{}", self.service, self.slice_num), self.namespace)
            .owned_by_service(self.service);

        for (i, port) in self.ports.iter().enumerate() {
            slice = slice.with_port(EndpointPort::new(format!("port-{i}"), *port));
        }

        for i in 1..=self.num_endpoints {
            let mut endpoint = SliceEndpoint::ready(format!("10.0.{}.{}", self.offset, i));
            endpoint.conditions.ready = i % self.unready_mod != 0;
            if !self.hosts.is_empty() {
                let host = self.hosts[i as usize % self.hosts.len()];
                endpoint = endpoint.with_topology(HOSTNAME_TOPOLOGY_KEY, host);
            }
            slice = slice.with_endpoint(endpoint);
        }

        slice
    }
}

/// Endpoint strings of one port, in map order.
pub fn endpoints_of<E: Endpoint>(map: &EndpointsMap<E>, port: &ServicePortName) -> Vec<String> {
    map.get(port)
        .map(|endpoints| endpoints.iter().map(|e| e.endpoint().to_string()).collect())
        .unwrap_or_default()
}
