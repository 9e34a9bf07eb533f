// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::serde::utc_time;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw location reading as reported by a location source.
///
/// The reading carries one fix: coordinate, altitude, accuracy figures,
/// speed, course and the UTC time the fix was acquired. Values are not
/// range checked.
///
/// # Fields
///
/// - `time` – Acquisition time of the fix in UTC.
/// - `latitude` – Latitude in decimal degrees (positive for north).
/// - `longitude` – Longitude in decimal degrees (positive for east).
/// - `altitude` – Altitude in meters.
/// - `horizontal_accuracy` – Estimated horizontal error radius in meters.
/// - `vertical_accuracy` – Estimated vertical error in meters. Some sources report negative values for "unknown".
/// - `speed` – Speed in meters per second.
/// - `course` – Course in degrees from true north.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationReading {
    #[serde(with = "utc_time")]
    pub time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub horizontal_accuracy: f64,
    pub vertical_accuracy: f64,
    pub speed: f64,
    pub course: f64,
}

impl LocationReading {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// One recorded GPS fix together with the device and battery metadata.
///
/// The fix fields are always written together from a single
/// [`LocationReading`] by [`PositionRecord::apply_location`]. `device_id`
/// and `battery` belong to the owning client and are never derived from a
/// reading.
///
/// A default record has an empty `device_id`, `time` at the Unix epoch and
/// every numeric field at `0.0`.
///
/// # Example
///
/// ```rust
/// use common::position::{LocationReading, PositionRecord};
/// use chrono::Utc;
///
/// let mut record = PositionRecord::default();
/// record.device_id = "dev-1".to_string();
/// record.battery = 0.82;
/// record.apply_location(&LocationReading {
///     time: Utc::now(),
///     latitude: 37.7749,
///     longitude: -122.4194,
///     altitude: 10.0,
///     horizontal_accuracy: 5.0,
///     vertical_accuracy: 3.0,
///     speed: 1.2,
///     course: 90.0,
/// });
/// assert_eq!(record.latitude, 37.7749);
/// assert_eq!(record.device_id, "dev-1");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub device_id: String,
    #[serde(with = "utc_time")]
    pub time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub horizontal_accuracy: f64,
    pub vertical_accuracy: f64,
    pub speed: f64,
    pub course: f64,
    pub battery: f64,
}

impl PositionRecord {
    /// Creates a record for the given device and battery level and
    /// populates it from `reading`.
    pub fn from_location(device_id: &str, battery: f64, reading: &LocationReading) -> Self {
        let mut record = PositionRecord {
            device_id: device_id.to_string(),
            battery,
            ..Default::default()
        };
        record.apply_location(reading);
        record
    }

    /// Overwrites all fix fields with the values of `reading`.
    ///
    /// `device_id` and `battery` are left untouched. The values are copied
    /// as they are, `vertical_accuracy` included.
    pub fn apply_location(&mut self, reading: &LocationReading) {
        *self = PositionRecord {
            device_id: std::mem::take(&mut self.device_id),
            battery: self.battery,
            time: reading.time,
            latitude: reading.latitude,
            longitude: reading.longitude,
            altitude: reading.altitude,
            horizontal_accuracy: reading.horizontal_accuracy,
            vertical_accuracy: reading.vertical_accuracy,
            speed: reading.speed,
            course: reading.course,
        };
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(record: &PositionRecord) -> serde_json::Result<String> {
        serde_json::to_string_pretty(record)
    }
}
