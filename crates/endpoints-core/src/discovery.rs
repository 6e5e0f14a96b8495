//! Endpoint slice records as delivered by the discovery API.
//!
//! These types mirror the camelCase JSON wire form so that records can be
//! deserialized directly from a watch stream or a fixture file. Structural
//! validation (unique port names, supported protocols, at least one target
//! per endpoint) happens upstream; the cache re-checks only what it relies
//! on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A set of endpoints that implement part of a service.
///
/// # Example
///
/// ```rust
/// use endpoints_core::EndpointSlice;
///
/// let slice: EndpointSlice = serde_json::from_str(r#"{
///     "metadata": {
///         "name": "web-abc12",
///         "namespace": "default",
///         "ownerReferences": [{"kind": "Service", "name": "web"}]
///     },
///     "ports": [{"name": "http", "protocol": "TCP", "port": 8080}],
///     "endpoints": [{"targets": ["10.0.0.1"], "conditions": {"ready": true}}]
/// }"#).unwrap();
///
/// assert_eq!(slice.owner_name(), Some("web"));
/// assert_eq!(slice.ports[0].port, Some(8080));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointSlice {
    /// Object metadata.
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// Ports exposed by every endpoint in this slice.
    #[serde(default)]
    pub ports: Vec<EndpointPort>,
    /// Kind of targets carried by the endpoints. Defaults to IP.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<TargetType>,
    /// The endpoints backing this slice.
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

impl EndpointSlice {
    /// Create an empty slice with the given name and namespace.
    #[must_use]
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMeta {
                name: name.into(),
                namespace: namespace.into(),
                ..ObjectMeta::default()
            },
            ..Self::default()
        }
    }

    /// Add an owner reference to a service.
    #[must_use]
    pub fn owned_by_service(mut self, service: impl Into<String>) -> Self {
        self.metadata.owner_references.push(OwnerReference {
            kind: "Service".to_string(),
            name: service.into(),
            ..OwnerReference::default()
        });
        self
    }

    /// Add a declared port.
    #[must_use]
    pub fn with_port(mut self, port: EndpointPort) -> Self {
        self.ports.push(port);
        self
    }

    /// Add an endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoints.push(endpoint);
        self
    }

    /// Name of the slice.
    #[inline]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Namespace of the slice.
    #[inline]
    pub fn namespace(&self) -> &str {
        &self.metadata.namespace
    }

    /// Name of the first owner reference, if any.
    #[inline]
    pub fn owner_name(&self) -> Option<&str> {
        self.metadata
            .owner_references
            .first()
            .map(|owner| owner.name.as_str())
    }
}

/// The subset of object metadata the cache and its callers look at.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Object name, unique within the namespace.
    #[serde(default)]
    pub name: String,
    /// Namespace of the object.
    #[serde(default)]
    pub namespace: String,
    /// Objects that own this one. The first entry names the owning service.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owner_references: Vec<OwnerReference>,
    /// Generation assigned by the API server on spec changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<i64>,
}

/// Reference from an object to its owner.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReference {
    /// API version of the owner.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    /// Kind of the owner, usually `Service`.
    #[serde(default)]
    pub kind: String,
    /// Name of the owner.
    pub name: String,
    /// UID of the owner.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uid: String,
}

/// Kind of target referred to by an endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetType {
    /// An IP address target.
    #[default]
    #[serde(rename = "IP")]
    Ip,
}

/// Transport protocol of a port.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    /// TCP, the default.
    #[default]
    Tcp,
    /// UDP.
    Udp,
    /// SCTP.
    Sctp,
}

/// A port shared by all endpoints of a slice.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointPort {
    /// Port name. Absent and empty are equivalent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// IP protocol for this port. Defaults to TCP upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
    /// Port number. Absent or zero means unspecified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
}

impl EndpointPort {
    /// Create a named TCP port.
    #[must_use]
    pub fn new(name: impl Into<String>, port: i32) -> Self {
        Self {
            name: Some(name.into()),
            protocol: Some(Protocol::Tcp),
            port: Some(port),
        }
    }

    /// Port name, empty when unset.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

/// A single backend, addressed by one or more targets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Target addresses. Only the first one is used for traffic.
    #[serde(default)]
    pub targets: Vec<String>,
    /// Current conditions of the endpoint.
    #[serde(default)]
    pub conditions: EndpointConditions,
    /// Stated hostname of the endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Object providing the endpoint, usually a pod.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_ref: Option<ObjectReference>,
    /// Topology labels, e.g. `kubernetes.io/hostname`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub topology: BTreeMap<String, String>,
}

impl Endpoint {
    /// Create a ready endpoint with a single target.
    #[must_use]
    pub fn ready(target: impl Into<String>) -> Self {
        Self {
            targets: vec![target.into()],
            conditions: EndpointConditions { ready: true },
            ..Self::default()
        }
    }

    /// Create an endpoint with a single target that is not ready.
    #[must_use]
    pub fn not_ready(target: impl Into<String>) -> Self {
        Self {
            targets: vec![target.into()],
            ..Self::default()
        }
    }

    /// Set a topology label.
    #[must_use]
    pub fn with_topology(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.topology.insert(key.into(), value.into());
        self
    }
}

/// Conditions of an endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConditions {
    /// Whether the endpoint is ready to serve traffic.
    #[serde(default)]
    pub ready: bool,
}

/// Reference to the object providing an endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    /// Kind of the referent.
    #[serde(default)]
    pub kind: String,
    /// Namespace of the referent.
    #[serde(default)]
    pub namespace: String,
    /// Name of the referent.
    #[serde(default)]
    pub name: String,
    /// UID of the referent.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uid: String,
}
