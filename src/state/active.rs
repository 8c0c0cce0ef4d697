// Network State - Active-Connection Mapper
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Fans active-connection records out onto devices and corrects device
//! status against them.
//!
//! The upstream per-device status field lags its active-connection state.
//! When a record reports the connected state for a device whose own
//! status disagrees, the device status is promoted to Activated. The
//! correction is one-directional: nothing here ever demotes a status.

use std::collections::BTreeMap;
use tracing::debug;

use super::registry::DeviceRegistry;
use crate::models::{ActiveApInfo, ActiveConnection, DevicePath, DeviceStatus, KindState, Ssid};

/// Outcome of one mapping pass, consumed by the facade for dispatch.
#[derive(Debug, Clone, Default)]
pub struct ActiveChange {
    /// Devices that received a non-empty active-connection bucket, in
    /// processing order. One notification is emitted per entry.
    pub per_device: Vec<DevicePath>,
    /// Devices whose status was promoted to Activated.
    pub promoted: Vec<DevicePath>,
    /// Wireless devices whose derived active-AP record changed, with the
    /// new value.
    pub active_ap_changed: Vec<(DevicePath, Option<ActiveApInfo>)>,
    /// Wireless devices whose hotspot presence flipped.
    pub hotspot_changed: Vec<(DevicePath, bool)>,
}

/// Map an active-connection snapshot onto the registry's devices.
///
/// Returns the retained global list plus the change descriptor. Every
/// device is explicitly assigned its bucket — or an empty list, so no
/// device is left holding stale sessions.
pub fn apply(registry: &mut DeviceRegistry, records: Vec<ActiveConnection>) -> (Vec<ActiveConnection>, ActiveChange) {
    let mut change = ActiveChange::default();
    let mut buckets: BTreeMap<DevicePath, Vec<ActiveConnection>> = BTreeMap::new();
    let mut global = Vec::with_capacity(records.len());

    for record in records {
        let referenced: Vec<DevicePath> = record
            .devices
            .iter()
            .filter(|path| !path.is_empty())
            .cloned()
            .collect();

        for path in &referenced {
            buckets.entry(path.clone()).or_default().push(record.clone());

            // Correct the lagging per-device status. Promotion only.
            if let Some(device) = registry.device_mut(path) {
                if record.is_connected() && device.status() != DeviceStatus::Activated {
                    debug!(
                        "{}: active connection state disagrees with device status, promoting to activated",
                        path
                    );
                    device.set_status(DeviceStatus::Activated);
                    change.promoted.push(path.clone());
                }
            }
        }

        global.push(record);
    }

    // Assign buckets; devices without one get an explicit empty list.
    for device in registry.iter_mut() {
        let path = device.path().clone();
        let bucket = buckets.remove(&path).unwrap_or_default();

        if !bucket.is_empty() {
            change.per_device.push(path.clone());
        }

        match device.kind_state_mut() {
            KindState::Wired(state) => {
                state.active_connections = bucket;
            }
            KindState::Wireless(state) => {
                let previous_hotspot = state.hotspot.is_some();
                let previous_active_ap = state.active_ap.clone();

                state.hotspot = bucket.iter().find(|record| record.is_hotspot()).cloned();

                // Re-derive the active-AP record: the wireless session's
                // id is the SSID, strength comes from the merged AP map
                // when the network is already known.
                state.active_ap = bucket
                    .iter()
                    .find(|record| record.connection_type == "wireless")
                    .map(|record| {
                        let known = state.access_points.get(&Ssid::new(record.id.as_str()));
                        ActiveApInfo::from_active_connection(record, known)
                    });

                state.active_connections = bucket;

                if state.hotspot.is_some() != previous_hotspot {
                    change
                        .hotspot_changed
                        .push((path.clone(), state.hotspot.is_some()));
                }
                if state.active_ap != previous_active_ap {
                    change
                        .active_ap_changed
                        .push((path.clone(), state.active_ap.clone()));
                }
            }
        }
    }

    (global, change)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::snapshot::DeviceDescriptor;
    use crate::models::{AccessPoint, ConnectionUuid, DeviceSnapshot};

    fn registry(entries: &[(&str, &str, u32)]) -> DeviceRegistry {
        // entries: (path, kind tag, state code)
        let mut snapshot = DeviceSnapshot::new();
        for (path, kind, state) in entries {
            snapshot
                .entry(kind.to_string())
                .or_insert_with(Vec::new)
                .push(DeviceDescriptor {
                    path: path.to_string(),
                    hw_address: String::new(),
                    state: *state,
                    enabled: true,
                    support_hotspot: false,
                });
        }
        let mut registry = DeviceRegistry::new();
        registry.reconcile(&snapshot);
        registry
    }

    fn record(uuid: &str, conn_type: &str, state: u32, devices: &[&str]) -> ActiveConnection {
        ActiveConnection {
            uuid: ConnectionUuid::new(uuid),
            id: format!("net-{}", uuid),
            connection_type: conn_type.to_string(),
            state,
            devices: devices.iter().map(|d| DevicePath::new(*d)).collect(),
        }
    }

    #[test]
    fn test_fan_out_to_all_referenced_devices() {
        let mut reg = registry(&[
            ("/d/a", "wired", 100),
            ("/d/b", "wired", 100),
            ("/d/c", "wired", 100),
        ]);

        let (global, change) = apply(&mut reg, vec![record("u1", "wired", 2, &["/d/a", "/d/b"])]);

        assert_eq!(global.len(), 1);
        assert_eq!(
            change.per_device,
            vec![DevicePath::new("/d/a"), DevicePath::new("/d/b")]
        );

        for path in ["/d/a", "/d/b"] {
            let device = reg.device(&DevicePath::new(path)).unwrap();
            assert_eq!(device.active_connections().len(), 1);
            assert_eq!(device.active_connections()[0].uuid.as_str(), "u1");
        }
        // Unreferenced device gets an explicit empty list.
        assert!(reg
            .device(&DevicePath::new("/d/c"))
            .unwrap()
            .active_connections()
            .is_empty());
    }

    #[test]
    fn test_status_promotion_is_one_directional() {
        let mut reg = registry(&[("/d/a", "wired", 30)]);

        let (_, change) = apply(&mut reg, vec![record("u1", "wired", 2, &["/d/a"])]);
        assert_eq!(change.promoted, vec![DevicePath::new("/d/a")]);
        assert_eq!(
            reg.device(&DevicePath::new("/d/a")).unwrap().status(),
            DeviceStatus::Activated
        );

        // A non-connected record never demotes.
        let (_, change) = apply(&mut reg, vec![record("u1", "wired", 1, &["/d/a"])]);
        assert!(change.promoted.is_empty());
        assert_eq!(
            reg.device(&DevicePath::new("/d/a")).unwrap().status(),
            DeviceStatus::Activated
        );
    }

    #[test]
    fn test_stale_bucket_is_cleared() {
        let mut reg = registry(&[("/d/a", "wired", 100)]);

        apply(&mut reg, vec![record("u1", "wired", 2, &["/d/a"])]);
        let (global, change) = apply(&mut reg, Vec::new());

        assert!(global.is_empty());
        assert!(change.per_device.is_empty());
        assert!(reg
            .device(&DevicePath::new("/d/a"))
            .unwrap()
            .active_connections()
            .is_empty());
    }

    #[test]
    fn test_wireless_active_ap_derivation_and_clear() {
        let mut reg = registry(&[("/d/w", "wireless", 100)]);

        // Seed the AP map so the derived record picks up strength.
        let path = DevicePath::new("/d/w");
        reg.device_mut(&path)
            .unwrap()
            .as_wireless_mut()
            .unwrap()
            .access_points
            .insert(
                Ssid::new("net-u1"),
                AccessPoint {
                    ssid: Ssid::new("net-u1"),
                    strength: 58,
                    path: "/ap/1".to_string(),
                    uuid: ConnectionUuid::new("u1"),
                },
            );

        let (_, change) = apply(&mut reg, vec![record("u1", "wireless", 2, &["/d/w"])]);
        assert_eq!(change.active_ap_changed.len(), 1);

        let state = reg.device(&path).unwrap().as_wireless().unwrap();
        let info = state.active_ap.as_ref().unwrap();
        assert_eq!(info.ssid, Ssid::new("net-u1"));
        assert_eq!(info.strength, 58);

        // Empty snapshot clears the derived record.
        let (_, change) = apply(&mut reg, Vec::new());
        assert_eq!(change.active_ap_changed, vec![(path.clone(), None)]);
        assert!(reg
            .device(&path)
            .unwrap()
            .as_wireless()
            .unwrap()
            .active_ap
            .is_none());
    }

    #[test]
    fn test_hotspot_presence_flips() {
        let mut reg = registry(&[("/d/w", "wireless", 100)]);
        let path = DevicePath::new("/d/w");

        let (_, change) = apply(
            &mut reg,
            vec![record("hs", "wireless-hotspot", 2, &["/d/w"])],
        );
        assert_eq!(change.hotspot_changed, vec![(path.clone(), true)]);
        assert!(reg
            .device(&path)
            .unwrap()
            .as_wireless()
            .unwrap()
            .hotspot_enabled());

        let (_, change) = apply(&mut reg, Vec::new());
        assert_eq!(change.hotspot_changed, vec![(path.clone(), false)]);
    }

    #[test]
    fn test_records_without_devices_stay_global_only() {
        let mut reg = registry(&[("/d/a", "wired", 100)]);

        let (global, change) = apply(&mut reg, vec![record("vpn", "vpn", 2, &[])]);
        assert_eq!(global.len(), 1);
        assert!(change.per_device.is_empty());
    }
}
