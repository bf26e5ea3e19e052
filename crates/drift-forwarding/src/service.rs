//! Mailbox service wrapper
//!
//! The forwarder is a single logical actor: no two of its operations may
//! ever run concurrently. [`ForwarderService::spawn`] moves a
//! [`LabelForwarder`] onto a dedicated task that drains a command mailbox
//! one event at a time; hosts keep a cheap, cloneable [`ForwarderHandle`]
//! and talk to the engine only through asynchronous messages. Queries carry
//! a `oneshot` reply channel back across the boundary.
//!
//! Every command is processed to completion before the next is picked up —
//! there is no cancellation and nothing here blocks on I/O. The service
//! stops when the last handle is dropped.

use drift_core::{ConfigRecord, PeerDirectory, PeerId, RoutingRecord, StateRecord};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::forwarder::LabelForwarder;

/// Commands accepted by the forwarder's mailbox
#[derive(Debug)]
pub enum ForwarderCommand {
    /// A neighbor came into contact range
    NeighborArrived(PeerId),
    /// A neighbor left contact range
    NeighborLeft(PeerId),
    /// A routing record arrived on a message
    RoutingReceived(RoutingRecord),
    /// A configuration section was loaded
    Configure(ConfigRecord),
    /// Request the outbound contact-exchange record
    RoutingRecordRequest {
        reply: oneshot::Sender<RoutingRecord>,
    },
    /// Request delegates for a target
    SelectDelegates {
        target: PeerId,
        already_targeted: Vec<PeerId>,
        reply: oneshot::Sender<Option<Vec<PeerId>>>,
    },
    /// Request targets the given neighbor could carry messages for
    GenerateTargets {
        neighbor: PeerId,
        reply: oneshot::Sender<Option<Vec<PeerId>>>,
    },
    /// Export the RIB as repository rows
    ExportState {
        reply: oneshot::Sender<Vec<StateRecord>>,
    },
    /// Apply persisted repository rows
    ImportState {
        records: Vec<StateRecord>,
        reply: oneshot::Sender<usize>,
    },
}

/// The service has stopped and can take no more commands
#[derive(Debug, Error, PartialEq, Eq)]
#[error("forwarder service has stopped")]
pub struct ServiceStopped;

/// Handle for sending commands to a spawned forwarder
#[derive(Debug, Clone)]
pub struct ForwarderHandle {
    tx: mpsc::Sender<ForwarderCommand>,
}

/// Runs a [`LabelForwarder`] on its own task
pub struct ForwarderService;

impl ForwarderService {
    /// Spawn the forwarder onto a dedicated task
    ///
    /// `buffer` bounds the mailbox; senders wait when it is full. The task
    /// finishes when every [`ForwarderHandle`] clone has been dropped.
    pub fn spawn<D: PeerDirectory + 'static>(
        mut forwarder: LabelForwarder<D>,
        buffer: usize,
    ) -> (ForwarderHandle, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel(buffer);

        let task = tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                Self::handle(&mut forwarder, command);
            }
            debug!("forwarder mailbox closed, stopping");
        });

        (ForwarderHandle { tx }, task)
    }

    fn handle<D: PeerDirectory>(forwarder: &mut LabelForwarder<D>, command: ForwarderCommand) {
        match command {
            ForwarderCommand::NeighborArrived(peer) => forwarder.on_neighbor_arrived(&peer),
            ForwarderCommand::NeighborLeft(peer) => forwarder.on_neighbor_left(&peer),
            ForwarderCommand::RoutingReceived(record) => {
                if let Err(e) = forwarder.receive_routing_info(&record) {
                    warn!(%e, "routing record rejected");
                }
            }
            ForwarderCommand::Configure(record) => forwarder.on_configured(&record),
            ForwarderCommand::RoutingRecordRequest { reply } => {
                let _ = reply.send(forwarder.routing_record());
            }
            ForwarderCommand::SelectDelegates {
                target,
                already_targeted,
                reply,
            } => {
                let _ = reply.send(forwarder.select_delegates(&target, &already_targeted));
            }
            ForwarderCommand::GenerateTargets { neighbor, reply } => {
                let _ = reply.send(forwarder.targets_for(&neighbor));
            }
            ForwarderCommand::ExportState { reply } => {
                let _ = reply.send(forwarder.export_state());
            }
            ForwarderCommand::ImportState { records, reply } => {
                let _ = reply.send(forwarder.import_state(&records));
            }
        }
    }
}

impl ForwarderHandle {
    async fn send(&self, command: ForwarderCommand) -> Result<(), ServiceStopped> {
        self.tx.send(command).await.map_err(|_| ServiceStopped)
    }

    async fn ask<R>(
        &self,
        command: ForwarderCommand,
        reply: oneshot::Receiver<R>,
    ) -> Result<R, ServiceStopped> {
        self.send(command).await?;
        reply.await.map_err(|_| ServiceStopped)
    }

    /// Report a neighbor arrival
    pub async fn neighbor_arrived(&self, peer: PeerId) -> Result<(), ServiceStopped> {
        self.send(ForwarderCommand::NeighborArrived(peer)).await
    }

    /// Report a neighbor departure
    pub async fn neighbor_left(&self, peer: PeerId) -> Result<(), ServiceStopped> {
        self.send(ForwarderCommand::NeighborLeft(peer)).await
    }

    /// Deliver a routing record that arrived on a message
    pub async fn routing_received(&self, record: RoutingRecord) -> Result<(), ServiceStopped> {
        self.send(ForwarderCommand::RoutingReceived(record)).await
    }

    /// Deliver a configuration section
    pub async fn configure(&self, record: ConfigRecord) -> Result<(), ServiceStopped> {
        self.send(ForwarderCommand::Configure(record)).await
    }

    /// Fetch the outbound contact-exchange record
    pub async fn routing_record(&self) -> Result<RoutingRecord, ServiceStopped> {
        let (reply, rx) = oneshot::channel();
        self.ask(ForwarderCommand::RoutingRecordRequest { reply }, rx)
            .await
    }

    /// Ask for delegates for a target
    pub async fn select_delegates(
        &self,
        target: PeerId,
        already_targeted: Vec<PeerId>,
    ) -> Result<Option<Vec<PeerId>>, ServiceStopped> {
        let (reply, rx) = oneshot::channel();
        self.ask(
            ForwarderCommand::SelectDelegates {
                target,
                already_targeted,
                reply,
            },
            rx,
        )
        .await
    }

    /// Ask which targets a neighbor could carry messages for
    pub async fn generate_targets(
        &self,
        neighbor: PeerId,
    ) -> Result<Option<Vec<PeerId>>, ServiceStopped> {
        let (reply, rx) = oneshot::channel();
        self.ask(ForwarderCommand::GenerateTargets { neighbor, reply }, rx)
            .await
    }

    /// Export the RIB as repository rows
    pub async fn export_state(&self) -> Result<Vec<StateRecord>, ServiceStopped> {
        let (reply, rx) = oneshot::channel();
        self.ask(ForwarderCommand::ExportState { reply }, rx).await
    }

    /// Apply persisted repository rows, returning how many were accepted
    pub async fn import_state(&self, records: Vec<StateRecord>) -> Result<usize, ServiceStopped> {
        let (reply, rx) = oneshot::channel();
        self.ask(ForwarderCommand::ImportState { records, reply }, rx)
            .await
    }
}
