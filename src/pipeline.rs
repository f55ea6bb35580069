//! # Event Pipeline
//!
//! Filter, render and submit, one tokio task per event.
//!
//! Rendering (which waits on image downloads) runs for up to
//! `render_concurrency` events at once. Submission goes through a single
//! lock around the transport, so the printer only ever sees one connection
//! at a time and receipts never interleave. A failure in one event is logged
//! and counted; it never stops the others.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::config::{Config, Endpoint};
use crate::error::SubmitError;
use crate::event::MessageEvent;
use crate::filter::{RelevanceFilter, Tag};
use crate::receipt::ReceiptRenderer;
use crate::transport::PrinterTransport;

/// What became of one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Not relevant to the monitored identity.
    Skipped,
    /// Printed, with the reasons it passed.
    Printed(BTreeSet<Tag>),
    /// Relevant, but the job never reached the printer.
    Failed(SubmitError),
}

/// Running totals over every event handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub printed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Summary {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Skipped => self.skipped += 1,
            Outcome::Printed(_) => self.printed += 1,
            Outcome::Failed(_) => self.failed += 1,
        }
    }
}

struct Stages {
    filter: RelevanceFilter,
    renderer: ReceiptRenderer,
    transport: Mutex<PrinterTransport>,
    endpoint: Endpoint,
    render_slots: Semaphore,
}

impl Stages {
    async fn process(&self, event: MessageEvent) -> Outcome {
        let verdict = self.filter.evaluate(&event).await;
        if !verdict.pass {
            debug!(event = event.id, "not relevant, skipping");
            return Outcome::Skipped;
        }

        println!("{}", event.summary(&verdict));

        let job = {
            let _slot = self.render_slots.acquire().await.ok();
            self.renderer.render(&event, &verdict).await
        };
        debug!(event = event.id, directives = job.len(), "rendered:\n{}", job.text());

        let result = {
            let transport = self.transport.lock().await;
            transport.submit(&job, &self.endpoint).await
        };

        match result {
            Ok(()) => {
                info!(event = event.id, tags = ?verdict.tags, "printed receipt");
                Outcome::Printed(verdict.tags)
            }
            Err(e) => {
                error!(event = event.id, "dropping print job: {}", e);
                Outcome::Failed(e)
            }
        }
    }
}

/// Drives events through the filter, renderer and printer.
pub struct Pipeline {
    stages: Arc<Stages>,
    tasks: JoinSet<Outcome>,
    summary: Summary,
}

impl Pipeline {
    pub fn new(
        config: &Config,
        filter: RelevanceFilter,
        renderer: ReceiptRenderer,
        transport: PrinterTransport,
    ) -> Self {
        Self {
            stages: Arc::new(Stages {
                filter,
                renderer,
                transport: Mutex::new(transport),
                endpoint: config.printer.clone(),
                render_slots: Semaphore::new(config.render_concurrency.max(1)),
            }),
            tasks: JoinSet::new(),
            summary: Summary::default(),
        }
    }

    /// Run one event to completion on the current task.
    pub async fn process(&self, event: MessageEvent) -> Outcome {
        self.stages.process(event).await
    }

    /// Start processing `event` in the background and return immediately.
    pub fn handle(&mut self, event: MessageEvent) {
        self.reap();
        let stages = Arc::clone(&self.stages);
        self.tasks.spawn(async move { stages.process(event).await });
    }

    /// Number of events still in flight.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Wait for every in-flight event and return the totals so far.
    pub async fn drain(&mut self) -> Summary {
        while let Some(joined) = self.tasks.join_next().await {
            self.collect(joined);
        }
        self.summary
    }

    fn reap(&mut self) {
        while let Some(joined) = self.tasks.try_join_next() {
            self.collect(joined);
        }
    }

    fn collect(&mut self, joined: Result<Outcome, tokio::task::JoinError>) {
        match joined {
            Ok(outcome) => self.summary.record(&outcome),
            Err(e) => {
                error!("event task panicked: {}", e);
                self.summary.failed += 1;
            }
        }
    }
}
