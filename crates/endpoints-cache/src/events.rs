//! Diagnostic events raised while building endpoint maps.
//!
//! The cache reports endpoints it had to drop because their address family
//! does not match the proxy's. Delivery is fire-and-forget: recorders must
//! not block, and a failing recorder never affects the map being built.

use std::fmt;
use std::sync::Arc;

use endpoints_core::{EndpointsError, Result, ServiceKey};
use tokio::sync::mpsc;
use tracing::trace;

/// An endpoint address whose IP family does not match the proxy's.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncorrectIpVersion {
    /// Service the endpoint belongs to.
    pub service: ServiceKey,
    /// The offending address.
    pub address: String,
    /// Field the address was read from.
    pub field: &'static str,
    /// Identifier of the object carrying the address, empty when unknown.
    pub source: String,
}

impl IncorrectIpVersion {
    /// Event reason, as shown next to the service.
    pub const REASON: &'static str = "KubeProxyIncorrectIPVersion";

    /// Human-readable message.
    pub fn message(&self) -> String {
        format!("{} in {} has incorrect IP version", self.address, self.field)
    }
}

impl fmt::Display for IncorrectIpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (service {})", self.message(), self.service)
    }
}

/// Sink for diagnostic events.
pub trait EventRecorder: Send + Sync {
    /// Record an IP family mismatch.
    ///
    /// Must not block. An error tells the cache the event was lost; the
    /// cache logs it and carries on.
    fn incorrect_ip_version(&self, event: IncorrectIpVersion) -> Result<()>;
}

impl<R: EventRecorder + ?Sized> EventRecorder for Arc<R> {
    fn incorrect_ip_version(&self, event: IncorrectIpVersion) -> Result<()> {
        (**self).incorrect_ip_version(event)
    }
}

/// Recorder that discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopRecorder;

impl EventRecorder for NoopRecorder {
    fn incorrect_ip_version(&self, _event: IncorrectIpVersion) -> Result<()> {
        Ok(())
    }
}

/// Recorder that forwards events over a bounded channel.
///
/// Uses `try_send` so the map builder never waits on a slow consumer. When
/// the channel is full the event is dropped.
#[derive(Clone, Debug)]
pub struct ChannelRecorder {
    sender: mpsc::Sender<IncorrectIpVersion>,
}

impl ChannelRecorder {
    /// Create a recorder and the receiver its events arrive on.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<IncorrectIpVersion>) {
        let (sender, receiver) = mpsc::channel(buffer);
        (Self { sender }, receiver)
    }
}

impl EventRecorder for ChannelRecorder {
    fn incorrect_ip_version(&self, event: IncorrectIpVersion) -> Result<()> {
        match self.sender.try_send(event) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(event)) => {
                trace!(address = %event.address, "event channel full, dropping event");
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(EndpointsError::RecorderClosed),
        }
    }
}
