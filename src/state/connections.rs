// Network State - Connection Assigner
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Saved-connection buckets and per-device assignment.
//!
//! Connection snapshots arrive grouped by type. Each named bucket is
//! replaced wholesale — the feed sends the full bucket, so stale profiles
//! for that type are discarded. Wireless profiles never enter the store:
//! the access-point pipeline owns wireless entirely.

use std::collections::BTreeMap;
use tracing::debug;

use super::registry::DeviceRegistry;
use crate::models::{
    ConnectionProfile, ConnectionSnapshot, ConnectionType, ConnectionUuid, DeviceKind, HwAddress,
    Ssid,
};

/// Facade-owned saved-connection buckets, keyed by type.
#[derive(Debug, Default)]
pub struct ConnectionStore {
    buckets: BTreeMap<ConnectionType, Vec<ConnectionProfile>>,
}

impl ConnectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bucket(&self, kind: &ConnectionType) -> &[ConnectionProfile] {
        self.buckets.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn wireds(&self) -> &[ConnectionProfile] {
        self.bucket(&ConnectionType::Wired)
    }

    pub fn vpns(&self) -> &[ConnectionProfile] {
        self.bucket(&ConnectionType::Vpn)
    }

    pub fn pppoes(&self) -> &[ConnectionProfile] {
        self.bucket(&ConnectionType::Pppoe)
    }

    pub fn hotspots(&self) -> &[ConnectionProfile] {
        self.bucket(&ConnectionType::WirelessHotspot)
    }

    /// Look up a profile by uuid across all buckets.
    pub fn by_uuid(&self, uuid: &ConnectionUuid) -> Option<&ConnectionProfile> {
        self.buckets
            .values()
            .flatten()
            .find(|profile| &profile.uuid == uuid)
    }

    /// Look up a profile by source path across all buckets.
    pub fn by_path(&self, path: &str) -> Option<&ConnectionProfile> {
        self.buckets
            .values()
            .flatten()
            .find(|profile| profile.path == path)
    }

    /// Saved-connection uuid for an SSID, the hint used when connecting
    /// to a known access point.
    pub fn uuid_by_ssid(&self, ssid: &Ssid) -> Option<&ConnectionUuid> {
        self.buckets
            .values()
            .flatten()
            .find(|profile| profile.ssid.as_ref() == Some(ssid))
            .map(|profile| &profile.uuid)
    }

    /// Replace the buckets named by a snapshot and re-assign profiles to
    /// wired devices in the registry.
    ///
    /// Per bucket, profiles are partitioned into common (no hardware
    /// address) and per-device (keyed by hardware address). A wired
    /// device's effective list is the common wired profiles plus the
    /// per-device wired profiles matching its own address. The caller
    /// emits a single aggregate notification afterwards — consumers
    /// re-pull the full list.
    pub fn apply(&mut self, registry: &mut DeviceRegistry, snapshot: ConnectionSnapshot) {
        for (tag, profiles) in snapshot {
            // Wireless comes through the scan pipeline, not here.
            if tag.is_empty() || tag == "wireless" {
                continue;
            }

            debug!("Replacing {} connection bucket ({} profiles)", tag, profiles.len());
            self.buckets.insert(ConnectionType::from_tag(&tag), profiles);
        }

        self.assign_wired(registry);
    }

    fn assign_wired(&self, registry: &mut DeviceRegistry) {
        let wired = self.bucket(&ConnectionType::Wired);
        let common: Vec<ConnectionProfile> = wired
            .iter()
            .filter(|profile| profile.is_common())
            .cloned()
            .collect();

        let mut per_device: BTreeMap<&HwAddress, Vec<&ConnectionProfile>> = BTreeMap::new();
        for profile in wired.iter().filter(|profile| !profile.is_common()) {
            per_device.entry(&profile.hw_address).or_default().push(profile);
        }

        for device in registry.iter_mut() {
            if device.kind() != DeviceKind::Wired {
                continue;
            }

            let mut assigned = common.clone();
            if let Some(own) = per_device.get(device.hw_address()) {
                assigned.extend(own.iter().map(|profile| (*profile).clone()));
            }

            if let Some(state) = device.as_wired_mut() {
                state.connections = assigned;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::snapshot::DeviceDescriptor;
    use crate::models::{DevicePath, DeviceSnapshot};

    fn profile(uuid: &str, hw: &str) -> ConnectionProfile {
        ConnectionProfile {
            uuid: ConnectionUuid::new(uuid),
            id: format!("conn-{}", uuid),
            hw_address: HwAddress::new(hw),
            path: format!("/settings/{}", uuid),
            ssid: None,
        }
    }

    fn registry_with_wired(devices: &[(&str, &str)]) -> DeviceRegistry {
        let mut snapshot = DeviceSnapshot::new();
        snapshot.insert(
            "wired".to_string(),
            devices
                .iter()
                .map(|(path, hw)| DeviceDescriptor {
                    path: path.to_string(),
                    hw_address: hw.to_string(),
                    state: 100,
                    enabled: true,
                    support_hotspot: false,
                })
                .collect(),
        );
        let mut registry = DeviceRegistry::new();
        registry.reconcile(&snapshot);
        registry
    }

    fn wired_uuids(registry: &DeviceRegistry, path: &str) -> Vec<String> {
        registry
            .device(&DevicePath::new(path))
            .unwrap()
            .as_wired()
            .unwrap()
            .connections
            .iter()
            .map(|profile| profile.uuid.as_str().to_string())
            .collect()
    }

    #[test]
    fn test_common_and_per_device_partition() {
        let mut registry =
            registry_with_wired(&[("/d/1", "AA:AA:AA:AA:AA:01"), ("/d/2", "AA:AA:AA:AA:AA:02")]);
        let mut store = ConnectionStore::new();

        let mut snapshot = ConnectionSnapshot::new();
        snapshot.insert(
            "wired".to_string(),
            vec![
                profile("common", ""),
                profile("own-1", "AA:AA:AA:AA:AA:01"),
                profile("own-2", "AA:AA:AA:AA:AA:02"),
            ],
        );
        store.apply(&mut registry, snapshot);

        assert_eq!(wired_uuids(&registry, "/d/1"), vec!["common", "own-1"]);
        assert_eq!(wired_uuids(&registry, "/d/2"), vec!["common", "own-2"]);
    }

    #[test]
    fn test_bucket_is_replaced_wholesale() {
        let mut registry = registry_with_wired(&[("/d/1", "AA:AA:AA:AA:AA:01")]);
        let mut store = ConnectionStore::new();

        let mut first = ConnectionSnapshot::new();
        first.insert("wired".to_string(), vec![profile("old", "")]);
        store.apply(&mut registry, first);

        let mut second = ConnectionSnapshot::new();
        second.insert("wired".to_string(), vec![profile("new", "")]);
        store.apply(&mut registry, second);

        assert_eq!(store.wireds().len(), 1);
        assert_eq!(store.wireds()[0].uuid.as_str(), "new");
        assert_eq!(wired_uuids(&registry, "/d/1"), vec!["new"]);
    }

    #[test]
    fn test_wireless_bucket_is_excluded() {
        let mut registry = registry_with_wired(&[]);
        let mut store = ConnectionStore::new();

        let mut snapshot = ConnectionSnapshot::new();
        snapshot.insert("wireless".to_string(), vec![profile("wifi", "")]);
        snapshot.insert("vpn".to_string(), vec![profile("tunnel", "")]);
        store.apply(&mut registry, snapshot);

        assert!(store.bucket(&ConnectionType::Wireless).is_empty());
        assert_eq!(store.vpns().len(), 1);
    }

    #[test]
    fn test_untouched_buckets_survive() {
        let mut registry = registry_with_wired(&[]);
        let mut store = ConnectionStore::new();

        let mut first = ConnectionSnapshot::new();
        first.insert("vpn".to_string(), vec![profile("tunnel", "")]);
        store.apply(&mut registry, first);

        let mut second = ConnectionSnapshot::new();
        second.insert("pppoe".to_string(), vec![profile("dsl", "")]);
        store.apply(&mut registry, second);

        assert_eq!(store.vpns().len(), 1);
        assert_eq!(store.pppoes().len(), 1);
    }

    #[test]
    fn test_lookup_queries() {
        let mut registry = registry_with_wired(&[]);
        let mut store = ConnectionStore::new();

        let uuid = uuid::Uuid::new_v4().to_string();
        let mut hotspot = profile(&uuid, "");
        hotspot.ssid = Some(Ssid::new("shared-net"));
        let mut snapshot = ConnectionSnapshot::new();
        snapshot.insert("wireless-hotspot".to_string(), vec![hotspot]);
        store.apply(&mut registry, snapshot);

        assert!(store.by_uuid(&ConnectionUuid::new(&uuid)).is_some());
        assert!(store.by_path(&format!("/settings/{}", uuid)).is_some());
        assert_eq!(
            store.uuid_by_ssid(&Ssid::new("shared-net")).unwrap().as_str(),
            uuid
        );
        assert!(store.uuid_by_ssid(&Ssid::new("unknown")).is_none());
    }
}
