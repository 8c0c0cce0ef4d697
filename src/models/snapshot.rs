// Network State - Snapshot Shapes
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Inbound snapshot shapes and lenient parsing.
//!
//! The feed occasionally emits partial records. Parsing is lenient at the
//! element level: a snapshot that fails to parse as a whole is an error,
//! but a single malformed element inside an otherwise valid snapshot is
//! dropped with a debug trace and never fails the snapshot. Missing
//! fields take their defaults.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use super::access_point::AccessPoint;
use super::connection::{ActiveConnection, ConnectionProfile};
use super::error::{Error, Result};

/// One device entry in the device snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DeviceDescriptor {
    pub path: String,
    pub hw_address: String,
    /// Upstream numeric state code.
    pub state: u32,
    pub enabled: bool,
    pub support_hotspot: bool,
}

/// Full device snapshot: kind tag → descriptors.
pub type DeviceSnapshot = BTreeMap<String, Vec<DeviceDescriptor>>;

/// Full connection snapshot: type tag → profiles.
pub type ConnectionSnapshot = BTreeMap<String, Vec<ConnectionProfile>>;

/// Full wireless scan snapshot: device path → raw scan entries.
pub type WirelessScanSnapshot = BTreeMap<String, Vec<AccessPoint>>;

fn collect_entries<T: DeserializeOwned>(values: Vec<Value>, context: &str) -> Vec<T> {
    values
        .into_iter()
        .filter(|value| !value.is_null())
        .filter_map(|value| match serde_json::from_value::<T>(value) {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!("Dropping malformed {} entry: {}", context, err);
                None
            }
        })
        .collect()
}

/// Parse a device snapshot payload.
#[allow(dead_code)]
pub fn parse_device_snapshot(payload: &str) -> Result<DeviceSnapshot> {
    let raw: BTreeMap<String, Vec<Value>> =
        serde_json::from_str(payload).map_err(|e| Error::SnapshotParse(e.to_string()))?;

    Ok(raw
        .into_iter()
        .map(|(kind, values)| (kind, collect_entries(values, "device")))
        .collect())
}

/// Parse a connection snapshot payload.
#[allow(dead_code)]
pub fn parse_connection_snapshot(payload: &str) -> Result<ConnectionSnapshot> {
    let raw: BTreeMap<String, Vec<Value>> =
        serde_json::from_str(payload).map_err(|e| Error::SnapshotParse(e.to_string()))?;

    Ok(raw
        .into_iter()
        .map(|(tag, values)| (tag, collect_entries(values, "connection")))
        .collect())
}

/// Parse an active-connection snapshot payload.
///
/// The feed keys active connections by object path but the path key is
/// not part of the record; only the values are kept.
#[allow(dead_code)]
pub fn parse_active_snapshot(payload: &str) -> Result<Vec<ActiveConnection>> {
    let raw: BTreeMap<String, Value> =
        serde_json::from_str(payload).map_err(|e| Error::SnapshotParse(e.to_string()))?;

    Ok(collect_entries(
        raw.into_values().collect(),
        "active connection",
    ))
}

/// Parse a wireless scan payload covering one or more devices.
#[allow(dead_code)]
pub fn parse_wireless_scan(payload: &str) -> Result<WirelessScanSnapshot> {
    let raw: BTreeMap<String, Vec<Value>> =
        serde_json::from_str(payload).map_err(|e| Error::SnapshotParse(e.to_string()))?;

    Ok(raw
        .into_iter()
        .map(|(device, values)| (device, collect_entries(values, "access point")))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_device_snapshot() {
        let payload = r#"{
            "wired": [
                {"Path": "/d/1", "HwAddress": "AA:BB:CC:00:11:22", "State": 100, "Enabled": true}
            ],
            "wireless": [
                {"Path": "/d/2", "HwAddress": "AA:BB:CC:00:11:33", "State": 30,
                 "Enabled": true, "SupportHotspot": true}
            ]
        }"#;

        let snapshot = parse_device_snapshot(payload).unwrap();
        assert_eq!(snapshot["wired"].len(), 1);
        assert_eq!(snapshot["wired"][0].path, "/d/1");
        assert!(snapshot["wireless"][0].support_hotspot);
    }

    #[test]
    fn test_malformed_element_is_dropped_not_fatal() {
        let payload = r#"{
            "wired": [
                {"Path": "/d/1"},
                {"Path": 42},
                null
            ]
        }"#;

        let snapshot = parse_device_snapshot(payload).unwrap();
        assert_eq!(snapshot["wired"].len(), 1);
        assert_eq!(snapshot["wired"][0].path, "/d/1");
    }

    #[test]
    fn test_non_json_payload_is_an_error() {
        assert!(parse_device_snapshot("not json").is_err());
        assert!(parse_wireless_scan("[]").is_err());
    }

    #[test]
    fn test_parse_active_snapshot_drops_path_keys() {
        let payload = r#"{
            "/active/1": {"Uuid": "u1", "Id": "lan", "ConnectionType": "wired",
                          "State": 2, "Devices": ["/d/1"]},
            "/active/2": {}
        }"#;

        let records = parse_active_snapshot(payload).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().any(|r| r.uuid.as_str() == "u1"));
    }

    #[test]
    fn test_parse_wireless_scan() {
        let payload = r#"{
            "/d/2": [
                {"Ssid": "cafe", "Strength": 40, "Path": "/ap/1", "Uuid": ""},
                {"Ssid": "cafe", "Strength": 70, "Path": "/ap/2", "Uuid": ""}
            ]
        }"#;

        let scan = parse_wireless_scan(payload).unwrap();
        assert_eq!(scan["/d/2"].len(), 2);
    }
}
