//! Runs the controller against a live [`DataSource`].
//!
//! Fetches execute as tokio tasks and report back over a channel; the
//! owner applies completions one at a time, so every state transition
//! happens on the owner's task with nothing interleaved.

use std::sync::Arc;

use client_core::{Clock, Completion, DataSource, FetchTicket};
use shared::{domain::Page, error::FetchError};
use tokio::sync::mpsc;
use tracing::debug;
use url_state::LocationStore;

use crate::{
    controller::{ViewAction, ViewController, ViewSettings},
    snapshot::ViewSnapshot,
};

#[derive(Debug)]
struct FetchCompletion {
    ticket: FetchTicket,
    result: Result<Page, FetchError>,
}

pub struct CatalogSession<L: LocationStore> {
    controller: ViewController<L>,
    source: Arc<dyn DataSource>,
    completions_tx: mpsc::UnboundedSender<FetchCompletion>,
    completions_rx: mpsc::UnboundedReceiver<FetchCompletion>,
    outstanding: usize,
}

impl<L: LocationStore> CatalogSession<L> {
    /// Mounts the controller on `location` and starts the first fetch.
    /// Must be called from within a tokio runtime.
    pub fn start(
        location: L,
        source: Arc<dyn DataSource>,
        settings: ViewSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let mut session = Self {
            controller: ViewController::mount(location, settings, clock),
            source,
            completions_tx,
            completions_rx,
            outstanding: 0,
        };
        session.spawn_pending();
        session
    }

    pub fn controller(&self) -> &ViewController<L> {
        &self.controller
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.controller.snapshot()
    }

    /// Fetches started but not yet applied, superseded ones included.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn dispatch(&mut self, action: ViewAction) -> bool {
        let changed = self.controller.dispatch(action);
        self.spawn_pending();
        changed
    }

    pub fn refetch(&mut self) {
        self.controller.refetch();
        self.spawn_pending();
    }

    pub fn revalidate(&mut self) {
        self.controller.revalidate();
        self.spawn_pending();
    }

    fn spawn_pending(&mut self) {
        for ticket in self.controller.drain_fetches() {
            let source = Arc::clone(&self.source);
            let completions_tx = self.completions_tx.clone();
            self.outstanding += 1;
            tokio::spawn(async move {
                let result = source.fetch_page(ticket.key).await;
                if completions_tx.send(FetchCompletion { ticket, result }).is_err() {
                    debug!(page = ticket.key.page, "session dropped before fetch completed");
                }
            });
        }
    }

    /// Waits for the next fetch to finish and applies it. Returns `None`
    /// when nothing is outstanding.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        if self.outstanding == 0 {
            return None;
        }
        // The session holds a sender, so the channel never closes here.
        let FetchCompletion { ticket, result } = self.completions_rx.recv().await?;
        self.outstanding -= 1;
        let completion = self.controller.apply_fetch(ticket, result);
        debug!(
            page = ticket.key.page,
            ?completion,
            outstanding = self.outstanding,
            "fetch completion applied"
        );
        Some(completion)
    }

    /// Applies completions until no fetch is outstanding.
    pub async fn settle(&mut self) {
        while self.next_completion().await.is_some() {}
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
