// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::{
    position::PositionRecord,
    test_helper::position::{get_position_record, get_second_location_reading},
};
use chrono::{Timelike, Utc};
use std::{fs::File, io::ErrorKind};
use storage::{PositionFsStorage, PositionStorage};

mod helper;
use helper::{get_path, open_fs_storage, setup_empty_test_folder};

#[test]
pub fn open_creates_position_folder() {
    let root = setup_empty_test_folder("open_creates_position_folder");
    PositionFsStorage::open(&root).unwrap();
    assert!(root.join("position").is_dir());
}

#[test]
pub fn open_fails_if_root_is_a_file() {
    let root = setup_empty_test_folder("open_fails_if_root_is_a_file");
    let file = root.join("blocked");
    File::create(&file).unwrap();
    assert!(PositionFsStorage::open(&file).is_err());
}

#[test]
pub fn create_returns_empty_record_without_writing() {
    let root = setup_empty_test_folder("create_returns_empty_record");
    let storage = PositionFsStorage::open(&root).unwrap();
    assert_eq!(storage.create(), PositionRecord::default());
    let entries = std::fs::read_dir(root.join("position")).unwrap().count();
    assert_eq!(entries, 0);
}

#[tokio::test]
#[test_log::test]
pub async fn save_and_load_record() {
    let folder = "save_and_load_record";
    setup_empty_test_folder(folder);
    let storage = open_fs_storage(folder);

    let id = storage.save(&get_position_record()).await.unwrap();
    assert_eq!(id, "dev-1_15_07_2024_13_00_00_000");
    assert!(
        get_path(folder)
            .join("position")
            .join(format!("{id}.position"))
            .is_file()
    );

    let record = storage.load(&id).await.unwrap();
    assert_eq!(record, get_position_record());
}

#[tokio::test]
#[test_log::test]
pub async fn save_overwrites_record_with_same_id() {
    let folder = "save_overwrites_record_with_same_id";
    setup_empty_test_folder(folder);
    let storage = open_fs_storage(folder);
    let mut record = get_position_record();
    storage.save(&record).await.unwrap();

    record.battery = 0.5;
    let id = storage.save(&record).await.unwrap();

    assert_eq!(storage.ids().await.unwrap(), vec![id.clone()]);
    assert_eq!(storage.load(&id).await.unwrap().battery, 0.5);
}

#[tokio::test]
#[test_log::test]
pub async fn list_ids_sorted_and_skip_foreign_files() {
    let folder = "list_ids_sorted_and_skip_foreign_files";
    setup_empty_test_folder(folder);
    let storage = open_fs_storage(folder);
    let second =
        PositionRecord::from_location("dev-1", 0.8, &get_second_location_reading());
    let second_id = storage.save(&second).await.unwrap();
    let first_id = storage.save(&get_position_record()).await.unwrap();
    let position_dir = get_path(folder).join("position");
    File::create(position_dir.join("notes.txt")).unwrap();
    std::fs::create_dir(position_dir.join("nested.position")).unwrap();

    let ids = storage.ids().await.unwrap();

    assert_eq!(ids, vec![first_id, second_id]);
}

#[tokio::test]
#[test_log::test]
pub async fn delete_record() {
    let folder = "delete_record";
    setup_empty_test_folder(folder);
    let storage = open_fs_storage(folder);
    let id = storage.save(&get_position_record()).await.unwrap();

    storage.delete(&id).await.unwrap();

    assert!(storage.ids().await.unwrap().is_empty());
    assert_eq!(
        storage.delete(&id).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[tokio::test]
#[test_log::test]
pub async fn load_missing_record() {
    let folder = "load_missing_record";
    setup_empty_test_folder(folder);
    let storage = open_fs_storage(folder);
    let err = storage.load("missing").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
#[test_log::test]
pub async fn load_corrupt_record() {
    let folder = "load_corrupt_record";
    setup_empty_test_folder(folder);
    let storage = open_fs_storage(folder);
    std::fs::write(
        get_path(folder).join("position").join("broken.position"),
        "{ not json",
    )
    .unwrap();
    let err = storage.load("broken").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
}

/// Deterministic values spread over `[min, max)` with full mantissas.
fn spread_values(count: usize, min: f64, max: f64) -> Vec<f64> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    (0..count)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let unit = (state >> 11) as f64 / (1u64 << 53) as f64;
            min + unit * (max - min)
        })
        .collect()
}

#[tokio::test]
#[test_log::test]
pub async fn save_and_load_keeps_floats_exact() {
    let folder = "save_and_load_keeps_floats_exact";
    setup_empty_test_folder(folder);
    let storage = open_fs_storage(folder);
    let latitudes = spread_values(200, -90.0, 90.0);
    let longitudes = spread_values(200, -180.0, 180.0);

    for (latitude, longitude) in latitudes.into_iter().zip(longitudes) {
        let mut record = get_position_record();
        record.latitude = latitude;
        record.longitude = longitude;
        record.horizontal_accuracy = latitude.abs() / 7.0;
        record.battery = longitude.abs() / 180.0;
        let id = storage.save(&record).await.unwrap();
        assert_eq!(storage.load(&id).await.unwrap(), record);
    }
}

#[tokio::test]
#[test_log::test]
pub async fn save_and_load_keeps_sub_millisecond_time() {
    let folder = "save_and_load_keeps_sub_millisecond_time";
    setup_empty_test_folder(folder);
    let storage = open_fs_storage(folder);
    let mut record = get_position_record();
    record.time = Utc::now().with_nanosecond(123_456_789).unwrap();

    let id = storage.save(&record).await.unwrap();

    assert_eq!(storage.load(&id).await.unwrap().time, record.time);
}

#[tokio::test]
#[test_log::test]
pub async fn reject_non_finite_values_without_writing() {
    let folder = "reject_non_finite_values_without_writing";
    setup_empty_test_folder(folder);
    let storage = open_fs_storage(folder);
    let mut record = get_position_record();
    record.speed = f64::NAN;
    record.course = f64::INFINITY;

    let err = storage.save(&record).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(storage.ids().await.unwrap().is_empty());
}

#[tokio::test]
#[test_log::test]
pub async fn reject_ids_outside_of_storage() {
    let folder = "reject_ids_outside_of_storage";
    let root = setup_empty_test_folder(folder);
    let storage = open_fs_storage(folder);
    let outside = root.join("x.position");
    File::create(&outside).unwrap();

    let err = storage.delete("../x").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(outside.is_file());

    let err = storage.load("../x").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
#[test_log::test]
pub async fn reject_ids_with_extension() {
    let folder = "reject_ids_with_extension";
    setup_empty_test_folder(folder);
    let storage = open_fs_storage(folder);
    std::fs::write(
        get_path(folder).join("position").join("a.position"),
        PositionRecord::to_json(&get_position_record()).unwrap(),
    )
    .unwrap();

    let err = storage.load("a.b").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(storage.load("a").await.is_ok());
    assert_eq!(
        storage.delete("").await.unwrap_err().kind(),
        ErrorKind::InvalidInput
    );
}
