// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Serde helpers for the custom time formats used in the stored files.

pub mod utc_time;
