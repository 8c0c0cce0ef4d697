// Network State - Typed Identifiers
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Strongly-typed identifier newtypes.
//!
//! The upstream feed mixes path-keyed, uuid-keyed, and ssid-keyed maps of
//! plain strings. Distinct newtypes keep those keyspaces from being mixed
//! up at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, stable object path identifying a device.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DevicePath(String);

impl DevicePath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DevicePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DevicePath {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// UUID of a saved or active connection.
///
/// Kept as an opaque string rather than a parsed UUID: the feed
/// occasionally carries non-RFC values and a malformed uuid must not
/// invalidate the record that carries it.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionUuid(String);

impl ConnectionUuid {
    pub fn new(uuid: impl Into<String>) -> Self {
        Self(uuid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ConnectionUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConnectionUuid {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Wireless network name. The AP merge engine collapses physical access
/// points onto this key.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ssid(String);

impl Ssid {
    pub fn new(ssid: impl Into<String>) -> Self {
        Self(ssid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Ssid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Ssid {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Hardware (MAC) address of an adapter. Empty means "no specific
/// device" — a common connection profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HwAddress(String);

impl HwAddress {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for HwAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HwAddress {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_path_roundtrip() {
        let path = DevicePath::new("/org/freedesktop/NetworkManager/Devices/2");
        assert_eq!(path.as_str(), "/org/freedesktop/NetworkManager/Devices/2");
        assert!(!path.is_empty());
        assert!(DevicePath::default().is_empty());
    }

    #[test]
    fn test_serde_transparent() {
        let ssid: Ssid = serde_json::from_str("\"office-5g\"").unwrap();
        assert_eq!(ssid, Ssid::new("office-5g"));
        assert_eq!(serde_json::to_string(&ssid).unwrap(), "\"office-5g\"");
    }
}
