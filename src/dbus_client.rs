// Network State - Daemon Command Client
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Async D-Bus client used to forward commands to the network daemon.
//!
//! Commands are fire-and-forget or request/response, never retried: the
//! daemon's outcome is reported verbatim and the caller decides what to
//! do with a failure. State flows back through snapshots, not through
//! command replies.

use std::sync::Arc;
use tracing::{debug, error, info};
use zbus::{Connection, Result as ZbusResult};

use crate::models::{
    ConnectionUuid, DevicePath, Error, ProxyConfig, Result, DBUS_OBJECT_PATH, DBUS_SERVICE_NAME,
};

const DEVICE_INTERFACE: &str = "com.chrisdaggas.NetworkDaemon.Device";
const CONNECTION_INTERFACE: &str = "com.chrisdaggas.NetworkDaemon.Connection";
const WIRELESS_INTERFACE: &str = "com.chrisdaggas.NetworkDaemon.Wireless";
const PROXY_INTERFACE: &str = "com.chrisdaggas.NetworkDaemon.Proxy";

/// D-Bus client for the network daemon.
#[allow(dead_code)]
#[derive(Clone)]
pub struct DaemonClient {
    connection: Option<Arc<Connection>>,
}

#[allow(dead_code)]
impl DaemonClient {
    /// Create a new daemon client.
    pub fn new() -> Self {
        Self { connection: None }
    }

    /// Connect to the daemon.
    pub async fn connect(&mut self) -> Result<()> {
        match Connection::system().await {
            Ok(conn) => {
                debug!("Connected to system D-Bus");
                self.connection = Some(Arc::new(conn));
                Ok(())
            }
            Err(e) => {
                error!("Failed to connect to system D-Bus: {}", e);
                Err(Error::DbusConnectionFailed(e.to_string()))
            }
        }
    }

    /// Check if connected to the daemon.
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    fn conn(&self) -> Result<&Arc<Connection>> {
        self.connection.as_ref().ok_or(Error::DaemonNotRunning)
    }

    /// Enable or disable a device.
    pub async fn set_device_enable(&self, path: &DevicePath, enabled: bool) -> Result<()> {
        info!("Requesting device enable: {} -> {}", path, enabled);

        let result: ZbusResult<()> = self
            .conn()?
            .call_method(
                Some(DBUS_SERVICE_NAME),
                DBUS_OBJECT_PATH,
                Some(DEVICE_INTERFACE),
                "SetDeviceEnable",
                &(path.as_str(), enabled),
            )
            .await
            .map(|_| ());

        result.map_err(|e| Error::command_failed("SetDeviceEnable", e.to_string()))
    }

    /// Disconnect a device at the adapter level.
    pub async fn disconnect_device(&self, path: &DevicePath) -> Result<()> {
        let result: ZbusResult<()> = self
            .conn()?
            .call_method(
                Some(DBUS_SERVICE_NAME),
                DBUS_OBJECT_PATH,
                Some(DEVICE_INTERFACE),
                "DisconnectDevice",
                &(path.as_str(),),
            )
            .await
            .map(|_| ());

        result.map_err(|e| Error::command_failed("DisconnectDevice", e.to_string()))
    }

    /// Activate an access point on a wireless device.
    ///
    /// Returns the session object path the daemon reports. An empty path
    /// means the activation failed — the caller feeds the outcome into
    /// [`crate::state::NetworkState::on_activate_access_point_done`],
    /// which surfaces the named failure event.
    pub async fn activate_access_point(
        &self,
        device: &DevicePath,
        ap_path: &str,
        uuid: &ConnectionUuid,
    ) -> Result<String> {
        info!("Requesting AP activation: {} on {}", ap_path, device);

        let result: ZbusResult<String> = self
            .conn()?
            .call_method(
                Some(DBUS_SERVICE_NAME),
                DBUS_OBJECT_PATH,
                Some(WIRELESS_INTERFACE),
                "ActivateAccessPoint",
                &(device.as_str(), ap_path, uuid.as_str()),
            )
            .await
            .map(|reply| reply.body().deserialize().unwrap_or_default());

        match result {
            Ok(session_path) => Ok(session_path),
            Err(e) => {
                error!("AP activation failed: {}", e);
                Err(Error::AccessPointActivationFailed {
                    ap_path: ap_path.to_string(),
                    uuid: uuid.as_str().to_string(),
                })
            }
        }
    }

    /// Delete a saved connection by uuid.
    pub async fn delete_connection(&self, uuid: &ConnectionUuid) -> Result<()> {
        let result: ZbusResult<()> = self
            .conn()?
            .call_method(
                Some(DBUS_SERVICE_NAME),
                DBUS_OBJECT_PATH,
                Some(CONNECTION_INTERFACE),
                "DeleteConnection",
                &(uuid.as_str(),),
            )
            .await
            .map(|_| ());

        result.map_err(|e| Error::command_failed("DeleteConnection", e.to_string()))
    }

    /// Deactivate an active connection by uuid.
    pub async fn deactivate_connection(&self, uuid: &ConnectionUuid) -> Result<()> {
        let result: ZbusResult<()> = self
            .conn()?
            .call_method(
                Some(DBUS_SERVICE_NAME),
                DBUS_OBJECT_PATH,
                Some(CONNECTION_INTERFACE),
                "DeactivateConnection",
                &(uuid.as_str(),),
            )
            .await
            .map(|_| ());

        result.map_err(|e| Error::command_failed("DeactivateConnection", e.to_string()))
    }

    /// Request a wireless rescan. The refreshed list arrives through the
    /// next scan snapshot, several seconds later.
    pub async fn request_wireless_scan(&self) -> Result<()> {
        debug!("Requesting wireless rescan");

        let result: ZbusResult<()> = self
            .conn()?
            .call_method(
                Some(DBUS_SERVICE_NAME),
                DBUS_OBJECT_PATH,
                Some(WIRELESS_INTERFACE),
                "RequestWirelessScan",
                &(),
            )
            .await
            .map(|_| ());

        result.map_err(|e| Error::command_failed("RequestWirelessScan", e.to_string()))
    }

    /// Enable or disable VPN globally.
    pub async fn set_vpn_enable(&self, enabled: bool) -> Result<()> {
        let result: ZbusResult<()> = self
            .conn()?
            .call_method(
                Some(DBUS_SERVICE_NAME),
                DBUS_OBJECT_PATH,
                Some(CONNECTION_INTERFACE),
                "SetVpnEnable",
                &(enabled,),
            )
            .await
            .map(|_| ());

        result.map_err(|e| Error::command_failed("SetVpnEnable", e.to_string()))
    }

    /// Set the proxy method (none/manual/auto).
    pub async fn set_proxy_method(&self, method: &str) -> Result<()> {
        let result: ZbusResult<()> = self
            .conn()?
            .call_method(
                Some(DBUS_SERVICE_NAME),
                DBUS_OBJECT_PATH,
                Some(PROXY_INTERFACE),
                "SetProxyMethod",
                &(method,),
            )
            .await
            .map(|_| ());

        result.map_err(|e| Error::command_failed("SetProxyMethod", e.to_string()))
    }

    /// Set one proxy type's endpoint.
    pub async fn set_proxy(&self, proxy_type: &str, addr: &str, port: &str) -> Result<()> {
        let result: ZbusResult<()> = self
            .conn()?
            .call_method(
                Some(DBUS_SERVICE_NAME),
                DBUS_OBJECT_PATH,
                Some(PROXY_INTERFACE),
                "SetProxy",
                &(proxy_type, addr, port),
            )
            .await
            .map(|_| ());

        result.map_err(|e| Error::command_failed("SetProxy", e.to_string()))
    }

    /// Set the auto-proxy (PAC) URL.
    pub async fn set_auto_proxy(&self, url: &str) -> Result<()> {
        let result: ZbusResult<()> = self
            .conn()?
            .call_method(
                Some(DBUS_SERVICE_NAME),
                DBUS_OBJECT_PATH,
                Some(PROXY_INTERFACE),
                "SetAutoProxy",
                &(url,),
            )
            .await
            .map(|_| ());

        result.map_err(|e| Error::command_failed("SetAutoProxy", e.to_string()))
    }

    /// Set the hosts excluded from proxying.
    pub async fn set_proxy_ignore_hosts(&self, hosts: &str) -> Result<()> {
        let result: ZbusResult<()> = self
            .conn()?
            .call_method(
                Some(DBUS_SERVICE_NAME),
                DBUS_OBJECT_PATH,
                Some(PROXY_INTERFACE),
                "SetProxyIgnoreHosts",
                &(hosts,),
            )
            .await
            .map(|_| ());

        result.map_err(|e| Error::command_failed("SetProxyIgnoreHosts", e.to_string()))
    }

    /// Set the proxychains configuration.
    pub async fn set_chains_proxy(&self, config: &ProxyConfig) -> Result<()> {
        let result: ZbusResult<()> = self
            .conn()?
            .call_method(
                Some(DBUS_SERVICE_NAME),
                DBUS_OBJECT_PATH,
                Some(PROXY_INTERFACE),
                "SetChainsProxy",
                &(
                    config.proxy_type.as_str(),
                    config.url.as_str(),
                    config.port,
                    config.username.as_str(),
                    config.password.as_str(),
                ),
            )
            .await
            .map(|_| ());

        result.map_err(|e| Error::command_failed("SetChainsProxy", e.to_string()))
    }
}

impl Default for DaemonClient {
    fn default() -> Self {
        Self::new()
    }
}
