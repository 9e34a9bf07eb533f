// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::{PositionStorage, check_finite, check_id, record_id};
use async_trait::async_trait;
use common::position::PositionRecord;
use std::{collections::BTreeMap, io};
use tokio::sync::RwLock;

/// A [`PositionStorage`] that keeps the records in memory.
///
/// Nothing survives the process. Useful when positions are transmitted
/// right away or for tests.
#[derive(Default)]
pub struct MemoryPositionStorage {
    records: RwLock<BTreeMap<String, PositionRecord>>,
}

impl MemoryPositionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PositionStorage for MemoryPositionStorage {
    async fn save(&self, record: &PositionRecord) -> io::Result<String> {
        check_finite(record)?;
        let id = record_id(record);
        self.records.write().await.insert(id.clone(), record.clone());
        Ok(id)
    }

    async fn load(&self, id: &str) -> io::Result<PositionRecord> {
        check_id(id)?;
        self.records
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    async fn delete(&self, id: &str) -> io::Result<()> {
        check_id(id)?;
        self.records
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    async fn ids(&self) -> io::Result<Vec<String>> {
        Ok(self.records.read().await.keys().cloned().collect())
    }
}
