// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

#![allow(dead_code)]

use module_core::{EventBus, Module};
use std::path::PathBuf;
use storage::{PositionFsStorage, PositionStorage, StorageModule};
use tokio::task::JoinHandle;

pub fn get_path(folder_name: &str) -> PathBuf {
    PathBuf::from(format!("/tmp/position-tracker/storage/{folder_name}"))
}

pub fn setup_empty_test_folder(folder_name: &str) -> PathBuf {
    let path = get_path(folder_name);
    if let Ok(true) = std::fs::exists(&path) {
        std::fs::remove_dir_all(&path)
            .unwrap_or_else(|_| panic!("Failed to cleanup test dir {}", path.display()));
    }
    std::fs::create_dir_all(&path).unwrap_or_else(|err| {
        panic!(
            "Failed to create test dir for {}. Reason: {err}",
            path.display()
        )
    });
    path
}

pub fn open_fs_storage(folder_name: &str) -> PositionFsStorage {
    PositionFsStorage::open(&get_path(folder_name)).unwrap_or_else(|e| {
        panic!("Failed to open storage in {folder_name}. Reason: {e}")
    })
}

pub fn create_storage_module<S: PositionStorage + 'static>(
    storage: S,
    event_bus: &EventBus,
) -> JoinHandle<Result<(), ()>> {
    let ctx = event_bus.context();
    tokio::spawn(async move {
        let mut module = StorageModule::new(storage, ctx);
        module.run().await
    })
}
