//! Address-family filtering.
//!
//! A proxy running in single-stack mode only programs endpoints of its own
//! family. [`IpFamily`] expresses that mode explicitly instead of an optional
//! flag.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::EndpointsError;

/// Address family accepted when building endpoint maps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpFamily {
    /// No filtering.
    #[default]
    Any,
    /// Only IPv4 endpoints.
    #[serde(rename = "ipv4")]
    V4,
    /// Only IPv6 endpoints.
    #[serde(rename = "ipv6")]
    V6,
}

impl IpFamily {
    /// Check whether an endpoint address belongs to this family.
    ///
    /// Addresses that do not parse are classified as IPv4, so they pass a
    /// `V4` filter and fail a `V6` one.
    #[must_use]
    pub fn admits(self, address: &str) -> bool {
        match self {
            Self::Any => true,
            Self::V4 => !is_ipv6_str(address),
            Self::V6 => is_ipv6_str(address),
        }
    }

    /// Short name of the family.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::V4 => "ipv4",
            Self::V6 => "ipv6",
        }
    }
}

impl fmt::Display for IpFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IpFamily {
    type Err = EndpointsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "any" => Ok(Self::Any),
            "ipv4" | "v4" => Ok(Self::V4),
            "ipv6" | "v6" => Ok(Self::V6),
            _ => Err(EndpointsError::InvalidIpFamily(s.to_string())),
        }
    }
}

/// Check whether a string is an IPv6 address.
///
/// IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`) count as IPv4.
#[must_use]
pub fn is_ipv6_str(address: &str) -> bool {
    match address.parse::<IpAddr>() {
        Ok(IpAddr::V6(v6)) => v6.to_ipv4_mapped().is_none(),
        Ok(IpAddr::V4(_)) | Err(_) => false,
    }
}
