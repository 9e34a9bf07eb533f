// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::position::{LocationReading, PositionRecord};
use chrono::{DateTime, NaiveDate, Utc};

pub fn get_time(hour: u32, minute: u32, second: u32, milli: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2024, 7, 15)
        .and_then(|date| date.and_hms_milli_opt(hour, minute, second, milli))
        .map(|time| time.and_utc())
        .unwrap_or_else(|| panic!("Invalid test time {hour}:{minute}:{second}.{milli}"))
}

/// San Francisco, 15.07.2024 13:00:00.000 UTC.
pub fn get_location_reading() -> LocationReading {
    LocationReading {
        time: get_time(13, 0, 0, 0),
        latitude: 37.7749,
        longitude: -122.4194,
        altitude: 10.0,
        horizontal_accuracy: 5.0,
        vertical_accuracy: 3.0,
        speed: 1.2,
        course: 90.0,
    }
}

/// Oschersleben, 15.07.2024 13:00:05.250 UTC.
pub fn get_second_location_reading() -> LocationReading {
    LocationReading {
        time: get_time(13, 0, 5, 250),
        latitude: 52.025833,
        longitude: 11.279166,
        altitude: 87.5,
        horizontal_accuracy: 2.5,
        vertical_accuracy: -1.0,
        speed: 27.7,
        course: 271.3,
    }
}

pub fn get_position_record() -> PositionRecord {
    PositionRecord::from_location("dev-1", 0.82, &get_location_reading())
}
