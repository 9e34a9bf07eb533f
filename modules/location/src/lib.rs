// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Location Modul for the position tracker
//!
//! Provides location sources that publish [`LocationReading`]s on the event bus.

use common::position::LocationReading;

pub mod replay_source;

pub use replay_source::{ReplayLocationModule, read_readings_from_csv};
