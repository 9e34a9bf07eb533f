// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::{
    position::PositionRecord,
    test_helper::position::{get_position_record, get_second_location_reading},
};
use std::io::ErrorKind;
use storage::{MemoryPositionStorage, PositionStorage, record_id};

#[tokio::test]
pub async fn save_load_delete_record() {
    let storage = MemoryPositionStorage::new();
    let id = storage.save(&get_position_record()).await.unwrap();
    assert_eq!(storage.load(&id).await.unwrap(), get_position_record());

    storage.delete(&id).await.unwrap();
    assert_eq!(
        storage.load(&id).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        storage.delete(&id).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[tokio::test]
pub async fn ids_are_sorted() {
    let storage = MemoryPositionStorage::new();
    let late = PositionRecord::from_location("dev-1", 0.3, &get_second_location_reading());
    storage.save(&late).await.unwrap();
    storage.save(&get_position_record()).await.unwrap();
    assert_eq!(
        storage.ids().await.unwrap(),
        vec![record_id(&get_position_record()), record_id(&late)]
    );
}

#[test]
pub fn create_returns_default_record() {
    assert_eq!(MemoryPositionStorage::new().create(), PositionRecord::default());
}

#[test]
pub fn record_id_sanitizes_device_id() {
    let mut record = get_position_record();
    record.device_id = "Car 7/Front".to_string();
    assert_eq!(record_id(&record), "car_7_front_15_07_2024_13_00_00_000");
}

#[tokio::test]
pub async fn reject_non_finite_values() {
    let storage = MemoryPositionStorage::new();
    let mut record = get_position_record();
    record.latitude = f64::NEG_INFINITY;
    assert_eq!(
        storage.save(&record).await.unwrap_err().kind(),
        ErrorKind::InvalidInput
    );
    assert!(storage.ids().await.unwrap().is_empty());
}

#[tokio::test]
pub async fn reject_invalid_ids() {
    let storage = MemoryPositionStorage::new();
    assert_eq!(
        storage.load("../x").await.unwrap_err().kind(),
        ErrorKind::InvalidInput
    );
    assert_eq!(
        storage.delete("a.b").await.unwrap_err().kind(),
        ErrorKind::InvalidInput
    );
}
