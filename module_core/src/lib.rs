// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Core Modul for the position tracker
//!
//! Provides the event bus, the events and the module interface every modul is built on.

use common::position::{LocationReading, PositionRecord};
use std::{io::ErrorKind, sync::Arc};
use strum_macros::EnumDiscriminants;

/// Represents a high-level event in the system.
///
/// Each `Event` wraps an [`EventKind`], which defines the actual type
/// and data carried by the event.
///
/// This structure is designed to be passed through an [`EventBus`]
/// between asynchronous modules.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// The inner event type and associated data.
    pub kind: EventKind,
}

impl Event {
    /// Returns the discriminant of the carried [`EventKind`].
    pub fn event_type(&self) -> EventKindType {
        EventKindType::from(&self.kind)
    }
}

/// A request send by a module to another module.
///
/// `id` and `sender_addr` are echoed in the matching [`Response`] so that the
/// requester can pick its own answer from the bus.
#[derive(Clone, Debug, PartialEq)]
pub struct Request<T> {
    pub id: u64,
    pub sender_addr: u64,
    pub data: T,
}

impl<T> Request<T> {
    pub fn new(id: u64, sender_addr: u64, data: T) -> Self {
        Request {
            id,
            sender_addr,
            data,
        }
    }
}

impl Request<()> {
    pub fn empty_request(id: u64, sender_addr: u64) -> Arc<Self> {
        Arc::new(Request::new(id, sender_addr, ()))
    }
}

/// The answer to a [`Request`].
#[derive(Clone, Debug, PartialEq)]
pub struct Response<T> {
    pub id: u64,
    pub receiver_addr: u64,
    pub data: T,
}

impl<T> Response<T> {
    pub fn new(id: u64, receiver_addr: u64, data: T) -> Arc<Self> {
        Arc::new(Response {
            id,
            receiver_addr,
            data,
        })
    }
}

/// A thread-safe, reference-counted pointer to a [`LocationReading`].
pub type LocationReadingPtr = Arc<LocationReading>;
pub type EmptyRequestPtr = Arc<Request<()>>;
pub type SavePositionRequestPtr = Arc<Request<PositionRecord>>;
pub type SavePositionResponsePtr = Arc<Response<Result<String, ErrorKind>>>;
pub type LoadPositionRequestPtr = Arc<Request<String>>;
pub type LoadPositionResponsePtr = Arc<Response<Result<PositionRecord, ErrorKind>>>;
pub type DeletePositionRequestPtr = Arc<Request<String>>;
pub type DeletePositionResponsePtr = Arc<Response<Result<(), ErrorKind>>>;
pub type StoredPositionIdsResponsePtr = Arc<Response<Vec<String>>>;

/// Enumerates the different kinds of events that can be emitted
/// and transmitted via the [`EventBus`].
///
/// [`EventKindType`] is the payload free discriminant of every variant and is
/// used to wait for or filter a specific kind of event.
#[derive(Clone, Debug, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(EventKindType), derive(Hash))]
pub enum EventKind {
    /// Indicates that a module shall terminate.
    QuitEvent,

    /// A new fix reported by a location source.
    LocationReadingEvent(LocationReadingPtr),

    /// The current battery level of the device.
    BatteryLevelEvent(f64),

    SavePositionRequestEvent(SavePositionRequestPtr),
    SavePositionResponseEvent(SavePositionResponsePtr),

    LoadPositionRequestEvent(LoadPositionRequestPtr),
    LoadPositionResponseEvent(LoadPositionResponsePtr),

    /// Removes a stored position, e.g. after it was transmitted and acknowledged.
    DeletePositionRequestEvent(DeletePositionRequestPtr),
    DeletePositionResponseEvent(DeletePositionResponsePtr),

    LoadStoredPositionIdsRequestEvent(EmptyRequestPtr),
    LoadStoredPositionIdsResponseEvent(StoredPositionIdsResponsePtr),
}

/// Borrows the payload of an [`EventKind`] variant.
///
/// Evaluates to `Some(&payload)` if `$kind` is the given variant and `None`
/// otherwise.
///
/// ```rust
/// use module_core::{EventKind, payload_ref};
///
/// let kind = EventKind::BatteryLevelEvent(0.5);
/// assert_eq!(payload_ref!(kind, EventKind::BatteryLevelEvent), Some(&0.5));
/// assert_eq!(payload_ref!(EventKind::QuitEvent, EventKind::BatteryLevelEvent), None);
/// ```
#[macro_export]
macro_rules! payload_ref {
    ($kind:expr, $variant:path) => {
        match &$kind {
            $variant(payload) => Some(payload),
            _ => None,
        }
    };
}

/// A simple asynchronous event bus for publishing and subscribing to [`Event`]s.
///
/// The event bus uses a [`tokio::sync::broadcast::channel`] under the hood,
/// allowing multiple receivers to listen for the same stream of events.
///
/// Each published event is cloned and distributed to all active subscribers.
/// If no subscribers exist at the time of publication, the event is discarded silently.
pub struct EventBus {
    /// The broadcast sender used internally to distribute events.
    sender: tokio::sync::broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new [`EventBus`] with a fixed buffer capacity of 100 messages.
    ///
    /// When the buffer is full, the oldest messages are dropped automatically
    /// as new ones are published.
    pub fn new() -> Self {
        let (sender, _) = tokio::sync::broadcast::channel(100);
        EventBus { sender }
    }

    /// Subscribes to the event bus and returns a [`tokio::sync::broadcast::Receiver`].
    ///
    /// The returned receiver will receive all future events published after the
    /// subscription is created.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Publishes an [`Event`] to all active subscribers.
    ///
    /// If no subscribers exist, the event is discarded silently.
    pub fn publish(&self, event: &Event) {
        let _ = self.sender.send(event.clone());
    }

    /// Creates a [`ModuleCtx`] bound to this [`EventBus`].
    pub fn context(&self) -> ModuleCtx {
        ModuleCtx::new(self)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Defines the common interface for an asynchronous module
/// that can be executed and communicate via the [`EventBus`].
#[async_trait::async_trait]
pub trait Module: Send {
    /// Runs the module asynchronously until completion.
    ///
    /// This function typically contains the module's main event loop,
    /// reacting to messages received through the [`ModuleCtx`]. It returns
    /// after a [`EventKind::QuitEvent`] was received.
    async fn run(&mut self) -> Result<(), ()>;
}

/// Provides a module-scoped context for interacting with the [`EventBus`].
///
/// Each `ModuleCtx` owns both a sender and a receiver, allowing the module
/// to both publish and listen for events concurrently.
pub struct ModuleCtx {
    /// The broadcast sender used to publish events.
    pub sender: tokio::sync::broadcast::Sender<Event>,

    /// The broadcast receiver used to listen for events.
    pub receiver: tokio::sync::broadcast::Receiver<Event>,
}

impl ModuleCtx {
    /// Constructs a new [`ModuleCtx`] from the given [`EventBus`].
    ///
    /// Clones the internal broadcast sender and creates a new receiver.
    pub fn new(event_bus: &EventBus) -> Self {
        ModuleCtx {
            sender: event_bus.sender.clone(),
            receiver: event_bus.subscribe(),
        }
    }

    /// Wraps `kind` into an [`Event`] and sends it to every subscriber.
    ///
    /// Fails only if nobody is subscribed to the bus.
    pub fn publish_event(
        &self,
        kind: EventKind,
    ) -> Result<usize, tokio::sync::broadcast::error::SendError<Event>> {
        self.sender.send(Event { kind })
    }
}

pub mod test_helper;
