//! Serialized dispatch of host events and commands.
//!
//! One task drains an inbox and handles each item to completion before taking
//! the next, so two tasks for the same tab never run concurrently. Commands
//! carry a oneshot sender that receives their resolved [`Response`].

use std::sync::Arc;

use ghost_protocol::{Command, Response};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};

use crate::controller::VanishSummonController;
use crate::error::{GhostError, Result};
use crate::host::HostEvent;

/// One unit of work for the dispatch loop.
#[derive(Debug)]
pub enum Inbound {
	Event(HostEvent),
	Command(Command, oneshot::Sender<Response>),
	Shutdown(oneshot::Sender<()>),
}

/// Cloneable sender side of a running dispatcher.
#[derive(Debug, Clone)]
pub struct DispatcherHandle {
	inbox: mpsc::UnboundedSender<Inbound>,
}

impl DispatcherHandle {
	/// Queues a host lifecycle event.
	pub fn notify(&self, event: HostEvent) -> Result<()> {
		self.inbox.send(Inbound::Event(event)).map_err(|_| GhostError::DispatcherClosed)
	}

	/// Queues a command and waits for its response.
	pub async fn request(&self, command: Command) -> Result<Response> {
		let (tx, rx) = oneshot::channel();
		self.inbox.send(Inbound::Command(command, tx)).map_err(|_| GhostError::DispatcherClosed)?;
		rx.await.map_err(|_| GhostError::DispatcherClosed)
	}

	/// Stops the loop once earlier work is handled and tears the session down.
	pub async fn shutdown(&self) -> Result<()> {
		let (tx, rx) = oneshot::channel();
		self.inbox.send(Inbound::Shutdown(tx)).map_err(|_| GhostError::DispatcherClosed)?;
		rx.await.map_err(|_| GhostError::DispatcherClosed)
	}

	pub fn is_closed(&self) -> bool {
		self.inbox.is_closed()
	}
}

pub struct Dispatcher;

impl Dispatcher {
	/// Initializes the session and starts the dispatch loop.
	pub async fn start(controller: Arc<VanishSummonController>) -> Result<DispatcherHandle> {
		controller.session().init().await?;
		Ok(Self::spawn(controller))
	}

	/// Starts the dispatch loop over an already initialized session.
	pub fn spawn(controller: Arc<VanishSummonController>) -> DispatcherHandle {
		let (inbox, rx) = mpsc::unbounded_channel();
		tokio::spawn(run(controller, rx));
		DispatcherHandle { inbox }
	}
}

async fn run(controller: Arc<VanishSummonController>, mut rx: mpsc::UnboundedReceiver<Inbound>) {
	while let Some(item) = rx.recv().await {
		match item {
			Inbound::Event(event) => {
				trace!(target = "ghost.session", ?event, "event");
				controller.session().handle_event(event).await;
			}
			Inbound::Command(command, reply) => {
				debug!(target = "ghost.session", command = command.name(), "command");
				let response = controller.handle(command).await;
				// Caller may have given up waiting.
				let _ = reply.send(response);
			}
			Inbound::Shutdown(ack) => {
				rx.close();
				controller.session().teardown();
				let _ = ack.send(());
				break;
			}
		}
	}
	debug!(target = "ghost.session", "dispatcher stopped");
}
