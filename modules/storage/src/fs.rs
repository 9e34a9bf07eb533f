// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::{PositionStorage, check_finite, check_id, record_id};
use async_trait::async_trait;
use common::position::PositionRecord;
use std::{
    fs::DirBuilder,
    io,
    path::{Path, PathBuf},
};
use tokio::{
    fs::read_dir,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tracing::{debug, error, info};

const EXTENSION: &str = "position";

/// A file system based implementation of a [`PositionStorage`].
///
/// Each record is stored as a separate JSON file with the `.position`
/// extension in the folder `position` below the root directory.
///
/// ## Important
///
/// `PositionFsStorage` **does not implement any internal synchronization or locking mechanisms**.
/// Therefore, **only one instance should be used per root directory in the application at any time**.
pub struct PositionFsStorage {
    position_root_dir: PathBuf,
}

impl PositionFsStorage {
    /// Opens the storage in `root_dir`, creating the position folder if it
    /// doesn't exist yet.
    pub fn open(root_dir: &Path) -> io::Result<Self> {
        let position_root_dir = root_dir.join("position");
        if let Err(e) = DirBuilder::new().recursive(true).create(&position_root_dir) {
            error!(
                "Failed to create position dir folder {}. Error: {}",
                position_root_dir.to_string_lossy(),
                e
            );
            return Err(e);
        }
        info!(
            "Using position storage folder: {}",
            position_root_dir.to_string_lossy()
        );
        Ok(PositionFsStorage { position_root_dir })
    }

    fn file_path(&self, id: &str) -> io::Result<PathBuf> {
        check_id(id)?;
        Ok(self.position_root_dir.join(format!("{id}.{EXTENSION}")))
    }

    /// Writes `data` to the file at `path` and syncs it to disk.
    ///
    /// The file is created if it does not exist, or truncated if it does.
    async fn save_bytes(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        let mut file = tokio::fs::File::create(path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        Ok(())
    }

    async fn load_file(&self, path: &Path) -> io::Result<String> {
        let mut file = tokio::fs::File::open(path).await?;
        let mut json = String::default();
        file.read_to_string(&mut json).await?;
        Ok(json)
    }
}

#[async_trait]
impl PositionStorage for PositionFsStorage {
    async fn save(&self, record: &PositionRecord) -> io::Result<String> {
        check_finite(record)?;
        let id = record_id(record);
        let json = PositionRecord::to_json(record)?;
        let file_path = self.file_path(&id)?;
        self.save_bytes(&file_path, json.as_bytes()).await?;
        debug!("Saved position to \"{}\"", file_path.to_string_lossy());
        Ok(id)
    }

    async fn load(&self, id: &str) -> io::Result<PositionRecord> {
        let file_path = self.file_path(id)?;
        let json = self.load_file(&file_path).await?;
        let record = PositionRecord::from_json(&json)?;
        debug!("Loaded position from \"{}\"", file_path.to_string_lossy());
        Ok(record)
    }

    async fn delete(&self, id: &str) -> io::Result<()> {
        let file_path = self.file_path(id)?;
        tokio::fs::remove_file(&file_path).await?;
        debug!("Deleted position \"{}\"", file_path.to_string_lossy());
        Ok(())
    }

    async fn ids(&self) -> io::Result<Vec<String>> {
        let mut dirs = read_dir(&self.position_root_dir).await?;
        let mut result = vec![];
        while let Some(entry) = dirs.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if let Some(ext) = path.extension()
                && ext == EXTENSION
                && let Some(id) = path.file_stem()
            {
                result.push(id.to_string_lossy().to_string());
            }
        }
        result.sort();
        Ok(result)
    }
}
