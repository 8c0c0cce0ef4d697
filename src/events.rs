// Network State - Change Notifications
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Typed change notifications.
//!
//! Reconcilers return change descriptors; the state facade is the single
//! dispatcher that turns them into events on this bus. Consumers
//! subscribe and re-pull whatever state the event names — events carry
//! identity, not full payloads, except where the original feed shipped
//! the record with the notification (access points).

use tokio::sync::broadcast;
use tracing::trace;

use crate::models::{AccessPoint, ActiveApInfo, ConnectionUuid, DevicePath, ProxyConfig};
use crate::state::Connectivity;

/// Default bus capacity. Slow subscribers lag rather than block the
/// state context.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// A change notification emitted by the state facade.
#[derive(Debug, Clone)]
pub enum NetworkEvent {
    /// A device was added to or removed from the registry.
    DeviceListChanged,
    /// An existing device's whitelisted fields were patched.
    DeviceUpdated(DevicePath),
    /// A device's enabled flag flipped.
    DeviceEnableChanged { path: DevicePath, enabled: bool },
    /// The saved-connection buckets were replaced.
    ConnectionListChanged,
    /// A device's active-connection list changed.
    ActiveConnectionsChanged(DevicePath),
    ApAdded { device: DevicePath, ap: AccessPoint },
    ApChanged { device: DevicePath, ap: AccessPoint },
    ApRemoved { device: DevicePath, ap: AccessPoint },
    /// The derived active-AP record changed (or was cleared).
    ActiveApChanged {
        device: DevicePath,
        info: Option<ActiveApInfo>,
    },
    HotspotEnabledChanged { device: DevicePath, enabled: bool },
    /// The collaborator reported a failed AP activation.
    ActivateAccessPointFailed {
        device: DevicePath,
        ap_path: String,
        uuid: ConnectionUuid,
    },
    ConnectivityChanged(Connectivity),
    VpnEnabledChanged(bool),
    ProxyMethodChanged(String),
    ProxyIgnoreHostsChanged(String),
    AutoProxyChanged(String),
    ProxyChanged {
        proxy_type: String,
        config: ProxyConfig,
    },
}

/// Broadcast bus for [`NetworkEvent`].
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<NetworkEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<NetworkEvent> {
        self.sender.subscribe()
    }

    /// Emit an event. Having no subscribers is not an error.
    pub fn emit(&self, event: NetworkEvent) {
        trace!("emit: {:?}", event);
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.emit(NetworkEvent::ConnectionListChanged);
    }

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.emit(NetworkEvent::DeviceListChanged);
        bus.emit(NetworkEvent::DeviceUpdated(DevicePath::new("/d/1")));

        assert!(matches!(
            rx.recv().await.unwrap(),
            NetworkEvent::DeviceListChanged
        ));
        match rx.recv().await.unwrap() {
            NetworkEvent::DeviceUpdated(path) => assert_eq!(path.as_str(), "/d/1"),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
