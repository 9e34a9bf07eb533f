// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::LocationReading;
use module_core::{EventKind, Module, ModuleCtx};
use std::{
    io::{Error, ErrorKind},
    path::Path,
    sync::Arc,
    time::Duration,
};
use tracing::{debug, error, info};

/// Reads recorded location readings from a CSV file.
///
/// The file needs a header row with the columns `time`, `latitude`,
/// `longitude`, `altitude`, `horizontal_accuracy`, `vertical_accuracy`,
/// `speed` and `course`. `time` is in the format `DD.MM.YYYY HH:MM:SS.nnnnnnnnn` (UTC).
///
/// Errors:
/// - Propagates I/O errors from opening the file.
/// - `io::ErrorKind::InvalidData` for rows that can't be parsed.
pub fn read_readings_from_csv(file_path: &Path) -> Result<Vec<LocationReading>, Error> {
    let mut rdr = csv::Reader::from_path(file_path)?;
    let mut readings = Vec::new();
    for result in rdr.deserialize() {
        let reading: LocationReading = result.map_err(|e| {
            Error::new(
                ErrorKind::InvalidData,
                format!(
                    "Invalid location reading in {}. Error: {e}",
                    file_path.to_string_lossy()
                ),
            )
        })?;
        readings.push(reading);
    }
    debug!(
        "Loaded {} readings from {}",
        readings.len(),
        file_path.to_string_lossy()
    );
    Ok(readings)
}

#[derive(Clone)]
struct ReplayLocationModuleConfig {
    readings: Vec<LocationReading>,
    interval: Duration,
}

/// A location source that replays recorded readings.
///
/// The readings are published as [`EventKind::LocationReadingEvent`] in their
/// original order, one per `interval`. After the last reading the module stays
/// idle until it receives a [`EventKind::QuitEvent`].
pub struct ReplayLocationModule {
    ctx: ModuleCtx,
    config: Arc<ReplayLocationModuleConfig>,
}

impl ReplayLocationModule {
    pub fn new(
        ctx: ModuleCtx,
        readings: Vec<LocationReading>,
        interval: Duration,
    ) -> Result<Self, Error> {
        if readings.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidData,
                "readings parameter is empty",
            ));
        }
        if interval.is_zero() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "interval parameter must be greater than zero",
            ));
        }
        Ok(ReplayLocationModule {
            ctx,
            config: Arc::new(ReplayLocationModuleConfig { readings, interval }),
        })
    }
}

#[async_trait::async_trait]
impl Module for ReplayLocationModule {
    async fn run(&mut self) -> Result<(), ()> {
        let config = self.config.clone();
        let sender = self.ctx.sender.clone();
        let replay_task_handle = tokio::spawn(async move {
            replay_task(sender, config).await;
        });
        loop {
            match self.ctx.receiver.recv().await {
                Ok(event) => {
                    if let EventKind::QuitEvent = event.kind {
                        replay_task_handle.abort();
                        break;
                    }
                }
                Err(e) => error!("Failed to receive event. Error: {}", e),
            }
        }
        Ok(())
    }
}

async fn replay_task(
    sender: tokio::sync::broadcast::Sender<module_core::Event>,
    config: Arc<ReplayLocationModuleConfig>,
) {
    let mut timer = tokio::time::interval(config.interval);
    for (index, reading) in config.readings.iter().enumerate() {
        timer.tick().await;
        debug!("Replay reading {} at {}", index, reading.time);
        let _ = sender.send(module_core::Event {
            kind: EventKind::LocationReadingEvent(Arc::new(*reading)),
        });
    }
    info!("Replayed all {} readings", config.readings.len());
}
