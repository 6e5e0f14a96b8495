//! Service identity for endpoint aggregation.
//!
//! [`ServiceKey`] identifies a logical service by namespace and name, and
//! [`ServicePortName`] narrows it to one named port. Endpoint maps are keyed
//! by `ServicePortName`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::EndpointsError;

/// Namespace and name of a logical service.
///
/// The default value (empty namespace and name) is the key that slices
/// without an owner reference are filed under. No real service resolves to
/// it.
///
/// # Example
///
/// ```rust
/// use endpoints_core::ServiceKey;
///
/// let key = ServiceKey::new("ns1", "svc1");
/// assert_eq!(key.to_string(), "ns1/svc1");
/// assert_eq!("ns1/svc1".parse::<ServiceKey>().unwrap(), key);
/// ```
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ServiceKey {
    /// Namespace of the service.
    pub namespace: String,
    /// Name of the service.
    pub name: String,
}

impl ServiceKey {
    /// Create a new service key.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Check if this is the empty key.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.namespace.is_empty() && self.name.is_empty()
    }

    /// Narrow this key to one of the service's ports.
    #[must_use]
    pub fn port(&self, port: impl Into<String>) -> ServicePortName {
        ServicePortName {
            service: self.clone(),
            port: port.into(),
        }
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

impl FromStr for ServiceKey {
    type Err = EndpointsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, name) = s
            .split_once('/')
            .ok_or_else(|| EndpointsError::invalid_service_key(s, "missing '/' separator"))?;

        if namespace.is_empty() || name.is_empty() {
            return Err(EndpointsError::invalid_service_key(
                s,
                "namespace and name must be non-empty",
            ));
        }
        if name.contains('/') {
            return Err(EndpointsError::invalid_service_key(
                s,
                "name must not contain '/'",
            ));
        }

        Ok(Self::new(namespace, name))
    }
}

/// A service together with one of its port names.
///
/// The port name may be empty; distinct names are distinct identities even
/// when they come from the same slice.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ServicePortName {
    /// The owning service.
    pub service: ServiceKey,
    /// Port name, empty for unnamed ports.
    pub port: String,
}

impl ServicePortName {
    /// Create a new service port name.
    #[must_use]
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        port: impl Into<String>,
    ) -> Self {
        ServiceKey::new(namespace, name).port(port)
    }
}

impl fmt::Display for ServicePortName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.port.is_empty() {
            write!(f, "{}", self.service)
        } else {
            write!(f, "{}:{}", self.service, self.port)
        }
    }
}
