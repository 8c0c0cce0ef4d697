// Network State - State Facade
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! # State Facade
//!
//! Aggregates the reconcilers — device registry, connection assigner,
//! active-connection mapper, access-point merge engine — behind snapshot
//! entry points and queries, and is the single dispatcher of change
//! notifications.
//!
//! All mutation happens on the task that owns [`NetworkState`]; the
//! reconcilers are plain synchronous algorithms, so no locking is
//! involved. The connectivity prober runs elsewhere and feeds its
//! boolean outcome back through [`NetworkState::set_connectivity`], the
//! only writer of the connectivity value.

pub mod active;
pub mod connections;
pub mod registry;
pub mod wireless;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::events::{EventBus, NetworkEvent};
use crate::models::{
    AccessPoint, ActiveConnection, ConnectionProfile, ConnectionSnapshot, ConnectionUuid, Device,
    DeviceKind, DevicePath, DeviceSnapshot, ProxyConfig, Ssid, WirelessScanSnapshot,
};
use crate::services::connectivity::ProbeHandle;
use connections::ConnectionStore;
use registry::DeviceRegistry;

/// Internet reachability as decided by the prober.
///
/// `Portal` and `Limited` are reserved for richer probes; the current
/// prober only ever reports `Full` or `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    #[default]
    Unknown,
    None,
    Portal,
    Limited,
    Full,
}

/// Aggregated, queryable network state.
pub struct NetworkState {
    registry: DeviceRegistry,
    connections: ConnectionStore,
    active_connections: Vec<ActiveConnection>,
    connectivity: Connectivity,
    last_probe_completed: Option<DateTime<Utc>>,
    vpn_enabled: bool,
    proxy_method: String,
    proxy_ignore_hosts: String,
    auto_proxy: String,
    proxies: BTreeMap<String, ProxyConfig>,
    chains_proxy: ProxyConfig,
    events: EventBus,
    prober: Option<ProbeHandle>,
}

#[allow(dead_code)]
impl NetworkState {
    pub fn new(events: EventBus) -> Self {
        Self {
            registry: DeviceRegistry::new(),
            connections: ConnectionStore::new(),
            active_connections: Vec::new(),
            connectivity: Connectivity::Unknown,
            last_probe_completed: None,
            vpn_enabled: false,
            proxy_method: String::new(),
            proxy_ignore_hosts: String::new(),
            auto_proxy: String::new(),
            proxies: BTreeMap::new(),
            chains_proxy: ProxyConfig::default(),
            events,
            prober: None,
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Attach the prober trigger. Without one, probe requests are no-ops.
    pub fn attach_prober(&mut self, handle: ProbeHandle) {
        self.prober = Some(handle);
    }

    /// Request a reachability check. Coalesced if one is in flight.
    pub fn request_connectivity_check(&self) {
        if let Some(prober) = &self.prober {
            prober.request_check();
        }
    }

    // ========================================
    // Snapshot entry points
    // ========================================

    /// Reconcile a full device snapshot (§ registry).
    pub fn apply_device_snapshot(&mut self, snapshot: &DeviceSnapshot) {
        let change = self.registry.reconcile(snapshot);

        for path in &change.updated {
            self.events.emit(NetworkEvent::DeviceUpdated(path.clone()));
        }
        if change.structural {
            self.events.emit(NetworkEvent::DeviceListChanged);
        }
    }

    /// Replace saved-connection buckets and re-assign them to devices.
    pub fn apply_connection_snapshot(&mut self, snapshot: ConnectionSnapshot) {
        self.connections.apply(&mut self.registry, snapshot);
        // One coarse notification; consumers re-pull the full list.
        self.events.emit(NetworkEvent::ConnectionListChanged);
    }

    /// Map an active-connection snapshot onto devices.
    ///
    /// Also the designated prober trigger: a change in active
    /// connections is the best available signal that reachability may
    /// have changed.
    pub fn apply_active_snapshot(&mut self, records: Vec<ActiveConnection>) {
        let (global, change) = active::apply(&mut self.registry, records);
        self.active_connections = global;

        for path in change.per_device {
            self.events.emit(NetworkEvent::ActiveConnectionsChanged(path));
        }
        for (path, enabled) in change.hotspot_changed {
            self.events
                .emit(NetworkEvent::HotspotEnabledChanged { device: path, enabled });
        }
        for (path, info) in change.active_ap_changed {
            self.events
                .emit(NetworkEvent::ActiveApChanged { device: path, info });
        }

        self.request_connectivity_check();
    }

    /// Merge one wireless device's scan results.
    pub fn apply_wireless_scan(&mut self, path: &DevicePath, scan: Vec<AccessPoint>) {
        let Some(device) = self.registry.device_mut(path) else {
            debug!("Ignoring scan for unknown device {}", path);
            return;
        };
        let Some(state) = device.as_wireless_mut() else {
            debug!("Ignoring scan for non-wireless device {}", path);
            return;
        };

        let diff = wireless::merge_scan(state, scan);
        let active_ap = state.active_ap.clone();
        self.emit_ap_diff(path, diff, active_ap);
    }

    /// Merge a scan snapshot covering several devices.
    pub fn apply_wireless_scans(&mut self, snapshot: WirelessScanSnapshot) {
        for (device, scan) in snapshot {
            self.apply_wireless_scan(&DevicePath::new(device), scan);
        }
    }

    fn emit_ap_diff(
        &self,
        path: &DevicePath,
        diff: wireless::ApDiff,
        active_ap: Option<crate::models::ActiveApInfo>,
    ) {
        for ap in diff.added {
            self.events.emit(NetworkEvent::ApAdded { device: path.clone(), ap });
        }
        for ap in diff.changed {
            self.events.emit(NetworkEvent::ApChanged { device: path.clone(), ap });
        }
        for ap in diff.removed {
            self.events.emit(NetworkEvent::ApRemoved { device: path.clone(), ap });
        }
        if diff.active_refreshed {
            self.events.emit(NetworkEvent::ActiveApChanged {
                device: path.clone(),
                info: active_ap,
            });
        }
    }

    // ========================================
    // Collaborator signals
    // ========================================

    /// The collaborator reported a device enable flip.
    pub fn set_device_enabled(&mut self, path: &DevicePath, enabled: bool) {
        let Some(device) = self.registry.device_mut(path) else {
            return;
        };
        device.set_enabled(enabled);
        self.events.emit(NetworkEvent::DeviceEnableChanged {
            path: path.clone(),
            enabled,
        });
    }

    /// Airplane mode flipped. Wireless scan state is cleared when the
    /// radios go down; the caller forwards the matching enable/disable
    /// command for each returned wireless device.
    pub fn set_airplane_mode(&mut self, enabled: bool) -> Vec<DevicePath> {
        info!("Airplane mode {}", if enabled { "enabled" } else { "disabled" });

        let wireless: Vec<DevicePath> = self
            .registry
            .iter()
            .filter(|device| device.kind() == DeviceKind::Wireless)
            .map(|device| device.path().clone())
            .collect();

        if enabled {
            for path in &wireless {
                if let Some(state) = self
                    .registry
                    .device_mut(path)
                    .and_then(|device| device.as_wireless_mut())
                {
                    let diff = wireless::merge_scan(state, Vec::new());
                    let active_ap = state.active_ap.clone();
                    self.emit_ap_diff(path, diff, active_ap);
                }
            }
        }

        wireless
    }

    /// VPN enable signal with change detection.
    pub fn set_vpn_enabled(&mut self, enabled: bool) {
        if self.vpn_enabled != enabled {
            self.vpn_enabled = enabled;
            self.events.emit(NetworkEvent::VpnEnabledChanged(enabled));
        }
    }

    pub fn set_proxy_method(&mut self, method: String) {
        if self.proxy_method != method {
            self.proxy_method = method.clone();
            self.events.emit(NetworkEvent::ProxyMethodChanged(method));
        }
    }

    pub fn set_proxy_ignore_hosts(&mut self, hosts: String) {
        if self.proxy_ignore_hosts != hosts {
            self.proxy_ignore_hosts = hosts.clone();
            self.events.emit(NetworkEvent::ProxyIgnoreHostsChanged(hosts));
        }
    }

    pub fn set_auto_proxy(&mut self, url: String) {
        if self.auto_proxy != url {
            self.auto_proxy = url.clone();
            self.events.emit(NetworkEvent::AutoProxyChanged(url));
        }
    }

    /// Per-type proxy config signal; change detection on url and port.
    pub fn set_proxy(&mut self, proxy_type: &str, url: String, port: u32) {
        let config = ProxyConfig {
            proxy_type: proxy_type.to_string(),
            url,
            port,
            username: String::new(),
            password: String::new(),
        };

        let old = self.proxies.get(proxy_type);
        if old.map(|c| (&c.url, c.port)) != Some((&config.url, config.port)) {
            self.proxies.insert(proxy_type.to_string(), config.clone());
            self.events.emit(NetworkEvent::ProxyChanged {
                proxy_type: proxy_type.to_string(),
                config,
            });
        }
    }

    /// Proxychains config signal.
    pub fn set_chains_proxy(&mut self, config: ProxyConfig) {
        if self.chains_proxy != config {
            self.chains_proxy = config.clone();
            self.events.emit(NetworkEvent::ProxyChanged {
                proxy_type: "chains".to_string(),
                config,
            });
        }
    }

    /// Outcome of an AP activation command. An empty session path means
    /// the collaborator failed to activate; the failure is surfaced as a
    /// named event carrying the AP identity, never retried here.
    pub fn on_activate_access_point_done(
        &mut self,
        device: &DevicePath,
        ap_path: &str,
        uuid: &ConnectionUuid,
        session_path: &str,
    ) {
        let is_wireless = self
            .registry
            .device(device)
            .map(|d| d.kind() == DeviceKind::Wireless)
            .unwrap_or(false);
        if !is_wireless {
            debug!("Activation outcome for unknown wireless device {}", device);
            return;
        }

        if session_path.is_empty() {
            self.events.emit(NetworkEvent::ActivateAccessPointFailed {
                device: device.clone(),
                ap_path: ap_path.to_string(),
                uuid: uuid.clone(),
            });
        }
    }

    /// Record the prober's outcome. The only writer of connectivity.
    pub fn set_connectivity(&mut self, reachable: bool) {
        let new = if reachable {
            Connectivity::Full
        } else {
            Connectivity::None
        };
        self.last_probe_completed = Some(Utc::now());

        if self.connectivity != new {
            info!("Connectivity changed: {:?} -> {:?}", self.connectivity, new);
            self.connectivity = new;
            self.events.emit(NetworkEvent::ConnectivityChanged(new));
        }
    }

    // ========================================
    // Queries
    // ========================================

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    pub fn last_probe_completed(&self) -> Option<DateTime<Utc>> {
        self.last_probe_completed
    }

    pub fn vpn_enabled(&self) -> bool {
        self.vpn_enabled
    }

    pub fn proxy_method(&self) -> &str {
        &self.proxy_method
    }

    pub fn proxy_ignore_hosts(&self) -> &str {
        &self.proxy_ignore_hosts
    }

    pub fn auto_proxy(&self) -> &str {
        &self.auto_proxy
    }

    pub fn proxy(&self, proxy_type: &str) -> Option<&ProxyConfig> {
        self.proxies.get(proxy_type)
    }

    pub fn chains_proxy(&self) -> &ProxyConfig {
        &self.chains_proxy
    }

    pub fn devices(&self) -> Vec<&Device> {
        self.registry.iter().collect()
    }

    pub fn device(&self, path: &DevicePath) -> Option<&Device> {
        self.registry.device(path)
    }

    pub fn wireds(&self) -> &[ConnectionProfile] {
        self.connections.wireds()
    }

    pub fn vpns(&self) -> &[ConnectionProfile] {
        self.connections.vpns()
    }

    pub fn pppoes(&self) -> &[ConnectionProfile] {
        self.connections.pppoes()
    }

    pub fn hotspots(&self) -> &[ConnectionProfile] {
        self.connections.hotspots()
    }

    pub fn active_connections(&self) -> &[ActiveConnection] {
        &self.active_connections
    }

    pub fn connection_by_uuid(&self, uuid: &ConnectionUuid) -> Option<&ConnectionProfile> {
        self.connections.by_uuid(uuid)
    }

    pub fn connection_by_path(&self, path: &str) -> Option<&ConnectionProfile> {
        self.connections.by_path(path)
    }

    pub fn connection_name_by_uuid(&self, uuid: &ConnectionUuid) -> Option<&str> {
        self.connections.by_uuid(uuid).map(|p| p.id.as_str())
    }

    pub fn connection_uuid_by_ssid(&self, ssid: &Ssid) -> Option<&ConnectionUuid> {
        self.connections.uuid_by_ssid(ssid)
    }

    pub fn active_connection_by_uuid(&self, uuid: &ConnectionUuid) -> Option<&ActiveConnection> {
        self.active_connections.iter().find(|c| &c.uuid == uuid)
    }

    /// Merged AP list of one wireless device.
    pub fn ap_list(&self, path: &DevicePath) -> Vec<&AccessPoint> {
        self.registry
            .device(path)
            .and_then(|device| device.as_wireless())
            .map(|state| state.access_points.values().collect())
            .unwrap_or_default()
    }

    pub fn hotspot_enabled(&self, path: &DevicePath) -> bool {
        self.registry
            .device(path)
            .and_then(|device| device.as_wireless())
            .map(|state| state.hotspot_enabled())
            .unwrap_or(false)
    }

    /// Uuid of the hotspot a wireless device is currently hosting.
    pub fn active_hotspot_uuid(&self, path: &DevicePath) -> Option<&ConnectionUuid> {
        self.registry
            .device(path)
            .and_then(|device| device.as_wireless())
            .and_then(|state| state.hotspot.as_ref())
            .map(|record| &record.uuid)
    }
}
