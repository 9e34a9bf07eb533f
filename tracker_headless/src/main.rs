// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use clap::Parser;
use dirs::data_local_dir;
use location::{ReplayLocationModule, read_readings_from_csv};
use module_core::{Event, EventBus, EventKind, Module};
use recorder::PositionRecorder;
use std::{path::PathBuf, time::Duration};
use storage::{PositionFsStorage, StorageModule};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Identifier of this device, stored in every position.
    #[arg(short, long)]
    device_id: String,
    /// CSV file with the location readings to replay.
    #[arg(short, long)]
    readings: PathBuf,
    /// Storage folder, defaults to the local data dir.
    #[arg(short, long)]
    storage_dir: Option<PathBuf>,
    /// Interval between two replayed readings.
    #[arg(short, long, default_value_t = 1000)]
    interval_ms: u64,
    /// Battery level reported for the recorded positions.
    #[arg(short, long)]
    battery: Option<f64>,
}

fn get_storage_dir(cli: &Cli) -> Result<PathBuf, ()> {
    if let Some(dir) = &cli.storage_dir {
        return Ok(dir.clone());
    }
    let mut storage_dir = data_local_dir().ok_or_else(|| {
        error!("Could not determine local data directory");
    })?;
    storage_dir.push("tracker");
    Ok(storage_dir)
}

fn register_quit_handler(eb: &EventBus) -> Result<(), ()> {
    let sender = eb.context().sender;
    ctrlc::set_handler(move || {
        let _ = sender.send(Event {
            kind: EventKind::QuitEvent,
        });
    })
    .map_err(|e| error!("Failed to register Ctrl-C handler. Error: {}", e))
}

#[tokio::main]
async fn main() -> Result<(), ()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let storage_dir = get_storage_dir(&cli)?;
    let readings = read_readings_from_csv(&cli.readings).map_err(|e| {
        error!(
            "Failed to read readings from {}. Error: {}",
            cli.readings.to_string_lossy(),
            e
        )
    })?;
    let position_storage = PositionFsStorage::open(&storage_dir).map_err(|e| {
        error!(
            "Failed to open storage in {}. Error: {}",
            storage_dir.to_string_lossy(),
            e
        )
    })?;

    let eb = EventBus::default();
    let mut storage = StorageModule::new(position_storage, eb.context());
    let mut recorder = PositionRecorder::new(eb.context(), &cli.device_id);
    let mut location = ReplayLocationModule::new(
        eb.context(),
        readings,
        Duration::from_millis(cli.interval_ms),
    )
    .map_err(|e| error!("Failed to create ReplayLocationModule. Error: {}", e))?;
    register_quit_handler(&eb)?;
    if let Some(battery) = cli.battery {
        eb.publish(&Event {
            kind: EventKind::BatteryLevelEvent(battery),
        });
    }

    info!("Starting modules...");
    let (storage_result, recorder_result, location_result) =
        tokio::join!(storage.run(), recorder.run(), location.run());
    storage_result.and(recorder_result).and(location_result)
}
