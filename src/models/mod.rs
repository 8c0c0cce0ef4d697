// Network State - Record Model
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! # Record Model
//!
//! Typed representations of the entities reported by the
//! network-management collaborator:
//!
//! - **Device**: registry-owned adapters with kind-specific payload
//! - **ConnectionProfile / ActiveConnection**: saved and live sessions
//! - **AccessPoint / ActiveApInfo**: merged wireless scan state
//! - **Snapshot**: inbound feed shapes with lenient parsing
//! - **Config / Error**: ambient configuration and error types
//!
//! These types carry data and validity rules only; the reconciliation
//! algorithms live in `crate::state`.

pub mod access_point;
pub mod config;
pub mod connection;
pub mod device;
pub mod error;
pub mod ids;
pub mod snapshot;

// Re-export main types for convenience
pub use access_point::{AccessPoint, ActiveApInfo};
pub use config::{AppConfig, ConnectivityConfig};
pub use connection::{
    ActiveConnection, ConnectionProfile, ConnectionType, ProxyConfig, ACTIVE_CONNECTION_CONNECTED,
};
pub use device::{Device, DeviceKind, DeviceStatus, KindState, WiredState, WirelessState};
pub use error::{Error, Result};
pub use ids::{ConnectionUuid, DevicePath, HwAddress, Ssid};
pub use snapshot::{ConnectionSnapshot, DeviceDescriptor, DeviceSnapshot, WirelessScanSnapshot};

/// Application ID (matches desktop/D-Bus identifiers).
pub const APP_ID: &str = "com.chrisdaggas.network-state";

/// D-Bus service name of the network-management daemon this crate talks
/// to.
pub const DBUS_SERVICE_NAME: &str = "com.chrisdaggas.NetworkDaemon";

/// D-Bus object path of the daemon's main object.
pub const DBUS_OBJECT_PATH: &str = "/com/chrisdaggas/NetworkDaemon";

/// Configuration directory name (under XDG_CONFIG_HOME).
pub const CONFIG_DIR_NAME: &str = "network-state";
