// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Recorder Modul for the position tracker
//!
//! Turns location readings into position records of this device and hands them to the storage.

use async_trait::async_trait;
use common::position::{LocationReading, PositionRecord};
use module_core::{EventKind, Module, ModuleCtx, Request, SavePositionResponsePtr};
use tracing::{debug, error, info};

/// Records every [`LocationReading`] as a [`PositionRecord`] of this device.
///
/// The recorder owns the client fields of a record: the device id, given at
/// construction, and the battery level, updated by
/// [`EventKind::BatteryLevelEvent`]. Each record is sent to the storage with
/// a [`EventKind::SavePositionRequestEvent`].
pub struct PositionRecorder {
    ctx: ModuleCtx,
    device_id: String,
    battery: f64,
    next_request_id: u64,
}

impl PositionRecorder {
    /// Address used as `sender_addr` of the save requests.
    pub const ADDRESS: u64 = 0x10;

    pub fn new(ctx: ModuleCtx, device_id: &str) -> Self {
        PositionRecorder {
            ctx,
            device_id: device_id.to_string(),
            battery: 0.0,
            next_request_id: 0,
        }
    }

    fn on_battery_level(&mut self, level: f64) {
        debug!("Battery level changed to {}", level);
        self.battery = level;
    }

    fn on_location_reading(&mut self, reading: &LocationReading) {
        let record = PositionRecord::from_location(&self.device_id, self.battery, reading);
        let request_id = self.next_request_id;
        self.next_request_id = self.next_request_id.wrapping_add(1);
        debug!(
            "Recorded position lat: {}, long: {} at {}",
            record.latitude, record.longitude, record.time
        );
        if let Err(e) = self
            .ctx
            .publish_event(EventKind::SavePositionRequestEvent(
                Request::new(request_id, PositionRecorder::ADDRESS, record).into(),
            ))
        {
            error!("Failed to send save request {}. Error: {}", request_id, e);
        }
    }

    fn on_save_response(&self, response: &SavePositionResponsePtr) {
        if response.receiver_addr != PositionRecorder::ADDRESS {
            return;
        }
        match &response.data {
            Ok(id) => debug!("Position {} stored with id {}", response.id, id),
            Err(kind) => error!("Failed to store position {}. Error: {}", response.id, kind),
        }
    }
}

#[async_trait]
impl Module for PositionRecorder {
    async fn run(&mut self) -> Result<(), ()> {
        info!("Recording positions of device {}", self.device_id);
        loop {
            match self.ctx.receiver.recv().await {
                Ok(event) => match event.kind {
                    EventKind::QuitEvent => break,
                    EventKind::BatteryLevelEvent(level) => self.on_battery_level(level),
                    EventKind::LocationReadingEvent(reading) => self.on_location_reading(&reading),
                    EventKind::SavePositionResponseEvent(response) => {
                        self.on_save_response(&response)
                    }
                    _ => (),
                },
                Err(e) => error!("Failed to receive event. Error: {}", e),
            }
        }
        Ok(())
    }
}
