//! Local-node detection.

use std::collections::BTreeMap;

/// Topology label carrying the name of the node an endpoint runs on.
pub const HOSTNAME_TOPOLOGY_KEY: &str = "kubernetes.io/hostname";

/// Check whether an endpoint runs on this proxy's node.
///
/// An empty `hostname` never matches, so a proxy that does not know its own
/// node treats every endpoint as remote.
#[inline]
pub fn is_local(hostname: &str, topology: &BTreeMap<String, String>) -> bool {
    !hostname.is_empty()
        && topology
            .get(HOSTNAME_TOPOLOGY_KEY)
            .is_some_and(|node| node == hostname)
}
