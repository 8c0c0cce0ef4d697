// Network State - Access-Point Merge Engine
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Per-device wireless scan merging.
//!
//! A scan is a full report of what one adapter currently sees. Entries
//! are collapsed by SSID keeping the strongest observation, diffed
//! against the device's merged AP map, and the derived active-AP record
//! gets its signal value refreshed in place when its network shows up in
//! the scan.

use std::collections::BTreeMap;
use tracing::debug;

use crate::models::{AccessPoint, Ssid, WirelessState};

/// Diff produced by one scan merge, consumed by the facade for dispatch.
#[derive(Debug, Clone, Default)]
pub struct ApDiff {
    pub added: Vec<AccessPoint>,
    pub changed: Vec<AccessPoint>,
    pub removed: Vec<AccessPoint>,
    /// The active-AP record's strength (or saved-connection hint) was
    /// refreshed in place.
    pub active_refreshed: bool,
}

impl ApDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.changed.is_empty()
            && self.removed.is_empty()
            && !self.active_refreshed
    }
}

/// Merge one full scan into a wireless device's AP map.
///
/// A non-empty scan in which every entry is unusable is treated as a
/// corrupt tick and processed as "no entries" without the removal pass —
/// a bad payload must not wipe the AP set. A genuinely empty scan is a
/// valid "nothing visible" report and clears the map.
pub fn merge_scan(state: &mut WirelessState, scan: Vec<AccessPoint>) -> ApDiff {
    let scan_was_empty = scan.is_empty();

    // Collapse by SSID, strongest observation wins, first seen wins ties.
    let mut winners: BTreeMap<Ssid, AccessPoint> = BTreeMap::new();
    for entry in scan {
        if !entry.is_valid() {
            continue;
        }
        match winners.get(&entry.ssid) {
            Some(current) if current.strength >= entry.strength => {}
            _ => {
                winners.insert(entry.ssid.clone(), entry);
            }
        }
    }

    if winners.is_empty() && !scan_was_empty {
        debug!("Scan contained no usable entries, keeping previous AP set");
        return ApDiff::default();
    }

    let mut diff = ApDiff::default();

    for (ssid, ap) in &winners {
        refresh_active_ap(state, ap, &mut diff);

        match state.access_points.get(ssid) {
            None => diff.added.push(ap.clone()),
            Some(previous) if previous != ap => diff.changed.push(ap.clone()),
            Some(_) => {}
        }
        state.access_points.insert(ssid.clone(), ap.clone());
    }

    // Remove networks no longer visible.
    let stale: Vec<Ssid> = state
        .access_points
        .keys()
        .filter(|ssid| !winners.contains_key(*ssid))
        .cloned()
        .collect();
    for ssid in stale {
        if let Some(removed) = state.access_points.remove(&ssid) {
            diff.removed.push(removed);
        }
    }

    diff
}

/// Refresh the derived active-AP record in place when the scan reports
/// its SSID. Only the signal value is expected to drift between remaps,
/// but a stale uuid or path is also corrected while we are here.
fn refresh_active_ap(state: &mut WirelessState, ap: &AccessPoint, diff: &mut ApDiff) {
    let Some(active) = state.active_ap.as_mut() else {
        return;
    };
    if active.ssid.is_empty() || active.ssid != ap.ssid {
        return;
    }

    if active.strength != ap.strength {
        active.strength = ap.strength;
        diff.active_refreshed = true;
    }
    if !ap.uuid.is_empty() && active.uuid != ap.uuid {
        active.uuid = ap.uuid.clone();
        diff.active_refreshed = true;
    }
    if !ap.path.is_empty() && active.path != ap.path {
        active.path = ap.path.clone();
        diff.active_refreshed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActiveApInfo, ConnectionUuid};

    fn ap(ssid: &str, strength: i32, path: &str) -> AccessPoint {
        AccessPoint {
            ssid: Ssid::new(ssid),
            strength,
            path: path.to_string(),
            uuid: ConnectionUuid::default(),
        }
    }

    #[test]
    fn test_strongest_observation_wins() {
        let mut state = WirelessState::default();
        let diff = merge_scan(&mut state, vec![ap("cafe", 40, "/ap/1"), ap("cafe", 70, "/ap/2")]);

        assert_eq!(diff.added.len(), 1);
        assert_eq!(diff.added[0].strength, 70);
        assert_eq!(state.access_points[&Ssid::new("cafe")].path, "/ap/2");
    }

    #[test]
    fn test_equal_strength_keeps_first_seen() {
        let mut state = WirelessState::default();
        merge_scan(&mut state, vec![ap("cafe", 55, "/ap/1"), ap("cafe", 55, "/ap/2")]);

        assert_eq!(state.access_points[&Ssid::new("cafe")].path, "/ap/1");
    }

    #[test]
    fn test_vanished_ssid_is_removed_once() {
        let mut state = WirelessState::default();
        merge_scan(&mut state, vec![ap("cafe", 50, "/ap/1"), ap("office", 60, "/ap/2")]);

        let diff = merge_scan(&mut state, vec![ap("office", 61, "/ap/2")]);
        assert_eq!(diff.removed.len(), 1);
        assert_eq!(diff.removed[0].ssid, Ssid::new("cafe"));
        assert!(!state.access_points.contains_key(&Ssid::new("cafe")));

        // Gone means gone: the next scan does not report it again.
        let diff = merge_scan(&mut state, vec![ap("office", 61, "/ap/2")]);
        assert!(diff.removed.is_empty());
    }

    #[test]
    fn test_changed_emitted_only_when_record_differs() {
        let mut state = WirelessState::default();
        merge_scan(&mut state, vec![ap("cafe", 50, "/ap/1")]);

        let diff = merge_scan(&mut state, vec![ap("cafe", 50, "/ap/1")]);
        assert!(diff.changed.is_empty());

        let diff = merge_scan(&mut state, vec![ap("cafe", 51, "/ap/1")]);
        assert_eq!(diff.changed.len(), 1);
    }

    #[test]
    fn test_empty_scan_clears_but_corrupt_scan_does_not() {
        let mut state = WirelessState::default();
        merge_scan(&mut state, vec![ap("cafe", 50, "/ap/1")]);

        // All entries unusable: previous set must survive.
        let diff = merge_scan(&mut state, vec![ap("", 80, "/ap/9"), ap("", 0, "")]);
        assert!(diff.is_empty());
        assert_eq!(state.access_points.len(), 1);

        // Genuinely empty scan: nothing visible, set is cleared.
        let diff = merge_scan(&mut state, Vec::new());
        assert_eq!(diff.removed.len(), 1);
        assert!(state.access_points.is_empty());
    }

    #[test]
    fn test_active_ap_strength_refreshed_in_place() {
        let mut state = WirelessState::default();
        state.active_ap = Some(ActiveApInfo {
            ssid: Ssid::new("cafe"),
            strength: 40,
            uuid: ConnectionUuid::new("u1"),
            path: "/ap/1".to_string(),
            state: 2,
        });

        let diff = merge_scan(&mut state, vec![ap("cafe", 72, "/ap/1")]);
        assert!(diff.active_refreshed);
        assert_eq!(state.active_ap.as_ref().unwrap().strength, 72);
        // Identity fields untouched by a same-strength refresh.
        assert_eq!(state.active_ap.as_ref().unwrap().uuid.as_str(), "u1");

        // Unrelated SSIDs never touch the active record.
        let diff = merge_scan(&mut state, vec![ap("cafe", 72, "/ap/1"), ap("other", 90, "/ap/3")]);
        assert!(!diff.active_refreshed);
    }
}
