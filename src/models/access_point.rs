// Network State - Access Point Records
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Wireless access point records.
//!
//! An access point is identified by SSID, not by object path: multiple
//! physical APs broadcasting the same network collapse onto one logical
//! entry, and only the strongest observation of a scan is retained.

use serde::{Deserialize, Serialize};

use super::connection::ActiveConnection;
use super::ids::{ConnectionUuid, Ssid};

/// One merged access point, or one raw scan entry before merging.
///
/// Field names follow the upstream feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AccessPoint {
    pub ssid: Ssid,
    /// Signal quality. The feed reports 0-100 but the value is kept wide
    /// so an out-of-range observation degrades instead of failing parse.
    pub strength: i32,
    pub path: String,
    /// Saved-connection hint, empty when the network is unknown.
    pub uuid: ConnectionUuid,
}

impl AccessPoint {
    /// A scan entry is usable only if it names a network.
    pub fn is_valid(&self) -> bool {
        !self.ssid.is_empty()
    }
}

/// Derived record for the access point a wireless device is currently
/// connected to.
///
/// Seeded from the device's wireless active-connection record; the merge
/// engine refreshes `strength` in place as new scans report the same
/// SSID, so signal drift does not force a full active-connection remap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveApInfo {
    pub ssid: Ssid,
    pub strength: i32,
    pub uuid: ConnectionUuid,
    pub path: String,
    /// Upstream numeric session state at derivation time.
    pub state: u32,
}

impl ActiveApInfo {
    /// Derive the active-AP record from an active connection, picking up
    /// the last known strength when the SSID is already in the AP map.
    pub fn from_active_connection(conn: &ActiveConnection, known: Option<&AccessPoint>) -> Self {
        Self {
            ssid: Ssid::new(conn.id.as_str()),
            strength: known.map(|ap| ap.strength).unwrap_or(0),
            uuid: conn.uuid.clone(),
            path: known.map(|ap| ap.path.clone()).unwrap_or_default(),
            state: conn.state,
        }
    }
}
