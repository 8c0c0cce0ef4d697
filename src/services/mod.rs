// Network State - Background Services
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Background services.
//!
//! This module contains workers that run off the state context:
//! - Connectivity: Probes endpoint reachability on a timer and on demand

pub mod connectivity;

pub use connectivity::{ConnectivityChecker, ProbeHandle};
