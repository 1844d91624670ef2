//! Recompute session - keeps the newest balance report when recomputes overlap.
//!
//! Every recompute takes a ticket before it starts reading. When it finishes, its report
//! is only stored if no newer ticket has been handed out in the meantime, so a slow
//! request for last month can never overwrite a faster, later request for this month.

use crate::{
    core::{
        auth::AuthProvider,
        balance::{BalanceReport, BalanceRequest, load_balances},
    },
    errors::Result,
};
use sea_orm::DatabaseConnection;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tokio::sync::RwLock;
use tracing::{debug, info, trace};

/// Generation handed out by [`BudgetSession::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RecomputeTicket(u64);

/// Holds the latest published [`BalanceReport`].
#[derive(Debug, Default, Clone)]
pub struct BudgetSession {
    generation: Arc<AtomicU64>,
    latest: Arc<RwLock<Option<BalanceReport>>>,
}

impl BudgetSession {
    /// An empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a recompute. Any ticket issued earlier becomes stale.
    pub fn begin(&self) -> RecomputeTicket {
        RecomputeTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is still the newest one issued.
    #[must_use]
    pub fn is_current(&self, ticket: RecomputeTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Stores `report` if `ticket` is still current. Returns whether it was stored.
    pub async fn publish(&self, ticket: RecomputeTicket, report: BalanceReport) -> bool {
        let mut latest = self.latest.write().await;
        // Checked under the write lock so two publishers cannot interleave.
        if !self.is_current(ticket) {
            debug!("Discarding stale balance report {:?}", ticket);
            return false;
        }
        trace!("Publishing balance report {:?}", ticket);
        *latest = Some(report);
        true
    }

    /// The most recently published report.
    pub async fn latest(&self) -> Option<BalanceReport> {
        self.latest.read().await.clone()
    }

    /// Drops the stored report and invalidates in-flight recomputes.
    pub async fn clear(&self) {
        let mut latest = self.latest.write().await;
        self.begin();
        *latest = None;
        info!("Budget session cleared");
    }

    /// Recomputes balances for `request` and publishes the result.
    ///
    /// Returns the report when it was still current on completion, `None` when a newer
    /// recompute started meanwhile.
    pub async fn refresh(
        &self,
        db: &DatabaseConnection,
        auth: &dyn AuthProvider,
        request: &BalanceRequest,
    ) -> Result<Option<BalanceReport>> {
        let ticket = self.begin();
        let report = load_balances(db, auth, request).await?;
        if self.publish(ticket, report.clone()).await {
            Ok(Some(report))
        } else {
            Ok(None)
        }
    }
}
