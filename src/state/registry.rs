// Network State - Device Registry
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Authoritative device set and snapshot reconciliation.
//!
//! The registry is the only owner of [`Device`] instances. A device
//! snapshot is a full report: devices it names are created or patched,
//! devices it omits are removed.

use std::collections::BTreeSet;
use tracing::debug;

use crate::models::{Device, DeviceKind, DevicePath, DeviceSnapshot};
use std::collections::BTreeMap;

/// Outcome of one reconcile pass.
#[derive(Debug, Clone, Default)]
pub struct RegistryChange {
    /// A device was added or removed.
    pub structural: bool,
    /// Existing devices whose whitelisted fields actually changed.
    pub updated: Vec<DevicePath>,
}

/// Owns the authoritative set of devices, keyed by path.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: BTreeMap<DevicePath, Device>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile a full device snapshot against the current set.
    ///
    /// Descriptors of unrecognized kind are skipped; descriptors without
    /// a path are dropped — both are data-quality defects in the feed,
    /// not errors. Patches never touch the status field (see
    /// [`Device::patch`]); the active-connection mapper owns status
    /// correction.
    pub fn reconcile(&mut self, snapshot: &DeviceSnapshot) -> RegistryChange {
        let mut change = RegistryChange::default();
        let mut seen: BTreeSet<DevicePath> = BTreeSet::new();

        for (kind_tag, descriptors) in snapshot {
            let Some(kind) = DeviceKind::from_tag(kind_tag) else {
                debug!("Skipping devices of unrecognized kind: {}", kind_tag);
                continue;
            };

            for desc in descriptors {
                if desc.path.is_empty() {
                    debug!("Dropping device descriptor without a path");
                    continue;
                }

                let path = DevicePath::new(&desc.path);
                seen.insert(path.clone());

                match self.devices.get_mut(&path) {
                    None => {
                        debug!("Adding {} device {}", kind.as_str(), path);
                        self.devices
                            .insert(path, Device::from_descriptor(kind, desc));
                        change.structural = true;
                    }
                    Some(device) => {
                        if device.patch(desc) {
                            change.updated.push(path);
                        }
                    }
                }
            }
        }

        // Remove devices absent from the snapshot.
        let stale: Vec<DevicePath> = self
            .devices
            .keys()
            .filter(|path| !seen.contains(*path))
            .cloned()
            .collect();
        for path in stale {
            debug!("Removing device {}", path);
            self.devices.remove(&path);
            change.structural = true;
        }

        change
    }

    pub fn device(&self, path: &DevicePath) -> Option<&Device> {
        self.devices.get(path)
    }

    pub fn device_mut(&mut self, path: &DevicePath) -> Option<&mut Device> {
        self.devices.get_mut(path)
    }

    #[allow(dead_code)]
    pub fn contains(&self, path: &DevicePath) -> bool {
        self.devices.contains_key(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Device> {
        self.devices.values_mut()
    }

    #[allow(dead_code)]
    pub fn paths(&self) -> Vec<DevicePath> {
        self.devices.keys().cloned().collect()
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
