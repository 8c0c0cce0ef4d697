// Network State - Connection Records
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Saved connection profiles and active connection records.

use serde::{Deserialize, Serialize};

use super::ids::{ConnectionUuid, DevicePath, HwAddress, Ssid};

/// Numeric active-connection state meaning "connected" in the upstream
/// feed. The per-device status field is corrected against this value.
pub const ACTIVE_CONNECTION_CONNECTED: u32 = 2;

/// Type tag of a saved connection profile.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionType {
    Wired,
    Wireless,
    Vpn,
    Pppoe,
    WirelessHotspot,
    /// Any type tag this crate does not interpret. Stored as-is so the
    /// bucket survives for queries.
    #[serde(untagged)]
    Other(String),
}

impl ConnectionType {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "wired" => Self::Wired,
            "wireless" => Self::Wireless,
            "vpn" => Self::Vpn,
            "pppoe" => Self::Pppoe,
            "wireless-hotspot" => Self::WirelessHotspot,
            other => Self::Other(other.to_string()),
        }
    }

    #[allow(dead_code)]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Wired => "wired",
            Self::Wireless => "wireless",
            Self::Vpn => "vpn",
            Self::Pppoe => "pppoe",
            Self::WirelessHotspot => "wireless-hotspot",
            Self::Other(tag) => tag,
        }
    }
}

/// A saved connection profile pushed by the connection snapshot.
///
/// Field names follow the upstream feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ConnectionProfile {
    pub uuid: ConnectionUuid,
    pub id: String,
    /// Owning adapter. Empty means a "common" profile shared by every
    /// device of the bucket's type that lacks a more specific profile.
    pub hw_address: HwAddress,
    pub path: String,
    /// Present on hotspot profiles.
    pub ssid: Option<Ssid>,
}

impl ConnectionProfile {
    /// Whether this profile is shared rather than tied to one adapter.
    pub fn is_common(&self) -> bool {
        self.hw_address.is_empty()
    }
}

/// A live network session. One record may span multiple devices
/// (bonded/bridged setups); the active-connection mapper fans it out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ActiveConnection {
    pub uuid: ConnectionUuid,
    pub id: String,
    pub connection_type: String,
    pub state: u32,
    pub devices: Vec<DevicePath>,
}

impl ActiveConnection {
    /// Whether the upstream state marks this session as connected.
    pub fn is_connected(&self) -> bool {
        self.state == ACTIVE_CONNECTION_CONNECTED
    }

    /// Whether this session is a hosted hotspot.
    pub fn is_hotspot(&self) -> bool {
        self.connection_type == "wireless-hotspot"
    }
}

/// Proxy configuration for one proxy type (http/https/ftp/socks), plus
/// the proxychains endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub proxy_type: String,
    pub url: String,
    pub port: u32,
    pub username: String,
    pub password: String,
}
