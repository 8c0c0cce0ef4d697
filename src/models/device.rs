// Network State - Device Model
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Device records owned by the registry.
//!
//! A device is identified by its object path and carries a kind-specific
//! payload: wired devices own their assigned connection profiles, wireless
//! devices own the merged access-point map and the derived active-AP
//! record. The payload is a tagged union dispatched by pattern match —
//! there is no downcasting anywhere in the crate.

use serde::{Deserialize, Serialize};

use super::access_point::{AccessPoint, ActiveApInfo};
use super::connection::{ActiveConnection, ConnectionProfile};
use super::ids::{DevicePath, HwAddress, Ssid};
use super::snapshot::DeviceDescriptor;
use std::collections::BTreeMap;

/// Kind of network device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// Wired Ethernet adapter.
    Wired,
    /// Wireless (WiFi) adapter.
    Wireless,
}

impl DeviceKind {
    /// Parse the kind tag used by the device snapshot. Unrecognized tags
    /// return `None` and the caller skips the bucket.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "wired" => Some(Self::Wired),
            "wireless" => Some(Self::Wireless),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wired => "wired",
            Self::Wireless => "wireless",
        }
    }
}

/// Device status as reported by the upstream service.
///
/// The upstream feed uses the NetworkManager numeric state codes; the
/// intermediate configuration stages all map onto `Connecting`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    #[default]
    Unknown,
    Unavailable,
    Disconnected,
    Connecting,
    Activated,
    Deactivating,
    Failed,
}

impl DeviceStatus {
    /// Map an upstream numeric state code onto a status.
    pub fn from_code(code: u32) -> Self {
        match code {
            20 => Self::Unavailable,
            30 => Self::Disconnected,
            40..=90 => Self::Connecting,
            100 => Self::Activated,
            110 => Self::Deactivating,
            120 => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

/// State owned by a wired device.
#[derive(Debug, Clone, Default)]
pub struct WiredState {
    /// Connection profiles assigned to this device (common + per-device).
    pub connections: Vec<ConnectionProfile>,
    /// Active connections referencing this device.
    pub active_connections: Vec<ActiveConnection>,
}

/// State owned by a wireless device.
#[derive(Debug, Clone, Default)]
pub struct WirelessState {
    /// Whether the adapter can host a hotspot.
    pub support_hotspot: bool,
    /// Active connections referencing this device.
    pub active_connections: Vec<ActiveConnection>,
    /// Merged access points, one logical entry per SSID.
    pub access_points: BTreeMap<Ssid, AccessPoint>,
    /// Derived record for the AP of the current active connection.
    pub active_ap: Option<ActiveApInfo>,
    /// Active hotspot session, if this device is hosting one.
    pub hotspot: Option<ActiveConnection>,
}

impl WirelessState {
    pub fn hotspot_enabled(&self) -> bool {
        self.hotspot.is_some()
    }

    /// SSID of the current active connection, if any.
    #[allow(dead_code)]
    pub fn active_ap_ssid(&self) -> Option<&Ssid> {
        self.active_ap.as_ref().map(|info| &info.ssid)
    }
}

/// Kind-specific device payload.
#[derive(Debug, Clone)]
pub enum KindState {
    Wired(WiredState),
    Wireless(WirelessState),
}

/// A network device tracked by the registry.
#[derive(Debug, Clone)]
pub struct Device {
    path: DevicePath,
    hw_address: HwAddress,
    enabled: bool,
    status: DeviceStatus,
    kind_state: KindState,
}

impl Device {
    /// Construct a device from a snapshot descriptor.
    pub fn from_descriptor(kind: DeviceKind, desc: &DeviceDescriptor) -> Self {
        let kind_state = match kind {
            DeviceKind::Wired => KindState::Wired(WiredState::default()),
            DeviceKind::Wireless => KindState::Wireless(WirelessState {
                support_hotspot: desc.support_hotspot,
                ..WirelessState::default()
            }),
        };

        Self {
            path: DevicePath::new(&desc.path),
            hw_address: HwAddress::new(&desc.hw_address),
            enabled: desc.enabled,
            status: DeviceStatus::from_code(desc.state),
            kind_state,
        }
    }

    pub fn path(&self) -> &DevicePath {
        &self.path
    }

    pub fn hw_address(&self) -> &HwAddress {
        &self.hw_address
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn status(&self) -> DeviceStatus {
        self.status
    }

    pub fn set_status(&mut self, status: DeviceStatus) {
        self.status = status;
    }

    pub fn kind(&self) -> DeviceKind {
        match self.kind_state {
            KindState::Wired(_) => DeviceKind::Wired,
            KindState::Wireless(_) => DeviceKind::Wireless,
        }
    }

    /// Kind payload for pattern-match dispatch.
    #[allow(dead_code)]
    pub fn kind_state(&self) -> &KindState {
        &self.kind_state
    }

    /// Mutable kind payload for pattern-match dispatch.
    pub fn kind_state_mut(&mut self) -> &mut KindState {
        &mut self.kind_state
    }

    pub fn as_wired(&self) -> Option<&WiredState> {
        match &self.kind_state {
            KindState::Wired(state) => Some(state),
            KindState::Wireless(_) => None,
        }
    }

    pub fn as_wired_mut(&mut self) -> Option<&mut WiredState> {
        match &mut self.kind_state {
            KindState::Wired(state) => Some(state),
            KindState::Wireless(_) => None,
        }
    }

    pub fn as_wireless(&self) -> Option<&WirelessState> {
        match &self.kind_state {
            KindState::Wired(_) => None,
            KindState::Wireless(state) => Some(state),
        }
    }

    pub fn as_wireless_mut(&mut self) -> Option<&mut WirelessState> {
        match &mut self.kind_state {
            KindState::Wired(_) => None,
            KindState::Wireless(state) => Some(state),
        }
    }

    /// Active connections regardless of kind.
    pub fn active_connections(&self) -> &[ActiveConnection] {
        match &self.kind_state {
            KindState::Wired(state) => &state.active_connections,
            KindState::Wireless(state) => &state.active_connections,
        }
    }

    /// Apply a non-destructive patch from a later snapshot descriptor.
    ///
    /// Only whitelisted fields are taken: hardware address, enabled flag,
    /// and hotspot capability. The status field is NOT patched here — the
    /// upstream per-device status lags its active-connection state, so
    /// status corrections come from the active-connection mapper instead.
    ///
    /// Returns `true` if any field actually changed.
    pub fn patch(&mut self, desc: &DeviceDescriptor) -> bool {
        let mut changed = false;

        if self.hw_address.as_str() != desc.hw_address {
            self.hw_address = HwAddress::new(&desc.hw_address);
            changed = true;
        }

        if self.enabled != desc.enabled {
            self.enabled = desc.enabled;
            changed = true;
        }

        if let KindState::Wireless(state) = &mut self.kind_state {
            if state.support_hotspot != desc.support_hotspot {
                state.support_hotspot = desc.support_hotspot;
                changed = true;
            }
        }

        changed
    }
}
