// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Storage Modul for the position tracker
//!
//! Provides the interface and implementations to store and load recorded positions
//! until they are transmitted, and the module that serves storage requests on the event bus.

use async_trait::async_trait;
use common::position::PositionRecord;
use module_core::{
    DeletePositionRequestPtr, EmptyRequestPtr, EventKind, LoadPositionRequestPtr, Module,
    ModuleCtx, Response, SavePositionRequestPtr,
};
use std::io;
use tracing::{debug, error, info};

mod fs;
mod memory;

pub use fs::PositionFsStorage;
pub use memory::MemoryPositionStorage;

/// An asynchronous trait for storing and retrieving [`PositionRecord`]s.
///
/// An instance of a storage is the persistence context of the records it
/// creates. Records are value types, they are only written to the backend by
/// an explicit [`PositionStorage::save`].
///
/// # Errors
///
/// All fallible methods return [`std::io::Error`] if the backend fails (e.g. file missing, permission error).
#[async_trait]
pub trait PositionStorage: Send + Sync {
    /// Creates a new, empty record for this storage.
    ///
    /// Every field is at its default until the record is populated. Nothing
    /// is written to the backend.
    fn create(&self) -> PositionRecord {
        PositionRecord::default()
    }

    /// Saves a [`PositionRecord`] and returns its id.
    ///
    /// Overwrites any existing record with the same id. Records with a NaN or
    /// infinite field are rejected with `io::ErrorKind::InvalidInput`.
    async fn save(&self, record: &PositionRecord) -> io::Result<String>;

    /// Loads the [`PositionRecord`] with the given id.
    ///
    /// Returns `io::ErrorKind::NotFound` if the record does not exist and
    /// `io::ErrorKind::InvalidInput` if `id` fails [`check_id`].
    async fn load(&self, id: &str) -> io::Result<PositionRecord>;

    /// Deletes the record with the given id.
    ///
    /// Returns `io::ErrorKind::NotFound` if the record does not exist and
    /// `io::ErrorKind::InvalidInput` if `id` fails [`check_id`].
    async fn delete(&self, id: &str) -> io::Result<()>;

    /// Lists the ids of all stored records in ascending order.
    async fn ids(&self) -> io::Result<Vec<String>>;
}

/// Returns the storage id of a record.
///
/// The id consists of the device id, the date and the time of the fix, e.g.
/// `dev-1_15_07_2024_13_00_00_000`. Characters of the device id that are not
/// lowercase ascii letters, digits or `-` are replaced by `_` so that the id
/// can be used as a file name.
pub fn record_id(record: &PositionRecord) -> String {
    let device: String = record
        .device_id
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "{}_{}_{}",
        device,
        record.time.format("%d_%m_%Y"),
        record.time.format("%H_%M_%S_%3f")
    )
}

/// Checks that `id` only uses the characters produced by [`record_id`].
///
/// Returns `io::ErrorKind::InvalidInput` for empty ids and ids containing
/// anything but `[a-z0-9_-]`, e.g. path separators or dots.
pub fn check_id(id: &str) -> io::Result<()> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');
    if valid {
        return Ok(());
    }
    Err(io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("Invalid position id \"{id}\""),
    ))
}

/// Checks that every numeric field of `record` is finite.
///
/// NaN and infinite values can't be stored as JSON numbers, a record with
/// such a value is rejected with `io::ErrorKind::InvalidInput`.
pub fn check_finite(record: &PositionRecord) -> io::Result<()> {
    let fields = [
        ("latitude", record.latitude),
        ("longitude", record.longitude),
        ("altitude", record.altitude),
        ("horizontal_accuracy", record.horizontal_accuracy),
        ("vertical_accuracy", record.vertical_accuracy),
        ("speed", record.speed),
        ("course", record.course),
        ("battery", record.battery),
    ];
    match fields.iter().find(|(_, value)| !value.is_finite()) {
        Some((name, value)) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Position field {name} is not finite: {value}"),
        )),
        None => Ok(()),
    }
}

/// Serves the storage requests of the event bus with a [`PositionStorage`].
///
/// Every request is answered with the matching response event. The response
/// mirrors the request id and sender address, failures are reported as
/// [`io::ErrorKind`].
pub struct StorageModule<S: PositionStorage> {
    storage: S,
    module_ctx: ModuleCtx,
}

impl<S: PositionStorage> StorageModule<S> {
    pub fn new(storage: S, ctx: ModuleCtx) -> Self {
        StorageModule {
            storage,
            module_ctx: ctx,
        }
    }

    async fn handle_save_request(&self, req: &SavePositionRequestPtr) {
        let data = match self.storage.save(&req.data).await {
            Ok(id) => {
                debug!("Stored position with id {}", id);
                Ok(id)
            }
            Err(e) => {
                error!(
                    "Failed to store position of device {}. Error: {}",
                    req.data.device_id, e
                );
                Err(e.kind())
            }
        };
        self.send_response(EventKind::SavePositionResponseEvent(Response::new(
            req.id,
            req.sender_addr,
            data,
        )));
    }

    async fn handle_load_request(&self, req: &LoadPositionRequestPtr) {
        let data = match self.storage.load(&req.data).await {
            Ok(record) => {
                debug!("Loaded position with id {}", req.data);
                Ok(record)
            }
            Err(e) => {
                debug!("Failed to load position with id {}. Error: {}", req.data, e);
                Err(e.kind())
            }
        };
        self.send_response(EventKind::LoadPositionResponseEvent(Response::new(
            req.id,
            req.sender_addr,
            data,
        )));
    }

    async fn handle_delete_request(&self, req: &DeletePositionRequestPtr) {
        let data = self.storage.delete(&req.data).await.map_err(|e| {
            debug!("Failed to delete position with id {}. Error: {}", req.data, e);
            e.kind()
        });
        self.send_response(EventKind::DeletePositionResponseEvent(Response::new(
            req.id,
            req.sender_addr,
            data,
        )));
    }

    async fn handle_load_stored_ids_request(&self, req: &EmptyRequestPtr) {
        let ids = match self.storage.ids().await {
            Ok(ids) => {
                debug!("Loaded position ids {:?}", ids);
                ids
            }
            Err(e) => {
                error!("Failed to load position ids. Error: {}", e);
                vec![]
            }
        };
        self.send_response(EventKind::LoadStoredPositionIdsResponseEvent(
            Response::new(req.id, req.sender_addr, ids),
        ));
    }

    fn send_response(&self, kind: EventKind) {
        let _ = self.module_ctx.publish_event(kind);
    }
}

#[async_trait]
impl<S: PositionStorage> Module for StorageModule<S> {
    async fn run(&mut self) -> Result<(), ()> {
        info!("Storage module started");
        loop {
            match self.module_ctx.receiver.recv().await {
                Ok(event) => match event.kind {
                    EventKind::QuitEvent => break,
                    EventKind::SavePositionRequestEvent(request) => {
                        self.handle_save_request(&request).await;
                    }
                    EventKind::LoadPositionRequestEvent(request) => {
                        self.handle_load_request(&request).await;
                    }
                    EventKind::DeletePositionRequestEvent(request) => {
                        self.handle_delete_request(&request).await;
                    }
                    EventKind::LoadStoredPositionIdsRequestEvent(request) => {
                        self.handle_load_stored_ids_request(&request).await;
                    }
                    _ => (),
                },
                Err(e) => error!("Failed to receive event. Error: {}", e),
            }
        }
        info!("Storage module stopped");
        Ok(())
    }
}
