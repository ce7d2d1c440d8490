//!  Brisa Quote Agent
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # Quote Service
//!
//! Inbound surface for the messaging layer. Validates fail-fast, plans the
//! initial window, and queues the job: the browser session is exclusive, so
//! searches run one at a time in submission order and a started search is
//! never canceled.

use async_trait::async_trait;
use chrono::NaiveDate;

use brisa_search_queues::{JobHandler, JobQueue};

use crate::config::QuoteConfig;
use crate::date_windows::{TransportMode, plan_window};
use crate::errors::SearchError;
use crate::offers::{Plan, SearchOutcome, SearchRequest};
use crate::orchestrator::SearchRetryOrchestrator;
use crate::page_automation::PageAutomation;
use crate::passengers::PassengerConfig;

/// Raw inbound parameters, as they arrive from the conversation layer.
#[derive(Debug, Clone)]
pub struct SubmitSearch {
    pub destination: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub adults: u32,
    pub minor_count: u32,
    pub minor_ages: Vec<i64>,
    pub transport: TransportMode,
    pub plan: Plan,
    pub budget_per_adult: Option<f64>,
    pub desired_hotel: Option<String>,
}

struct SearchWorker<P> {
    orchestrator: SearchRetryOrchestrator<P>,
}

#[async_trait]
impl<P: PageAutomation + 'static> JobHandler<SearchRequest, SearchOutcome> for SearchWorker<P> {
    async fn handle(&mut self, request: SearchRequest) -> SearchOutcome {
        let today = chrono::Local::now().date_naive();
        match self.orchestrator.run(&request, today).await {
            Ok(outcome) => outcome,
            Err(SearchError::Exhausted { attempted }) => {
                tracing::warn!(phases = ?attempted, "search exhausted every phase");
                SearchOutcome {
                    success: false,
                    offers: Vec::new(),
                    window_used: request.window.clone(),
                    lodging_only_fallback: false,
                    message: format!(
                        "Sin disponibilidad para {} tras intentar: {}.",
                        request.destination,
                        attempted.join(", ")
                    ),
                }
            }
            Err(e) => {
                // Validation ran before enqueue; anything else here is a bug,
                // still rendered as a structured failure for the caller.
                tracing::error!(error = %e, "unexpected search failure");
                SearchOutcome {
                    success: false,
                    offers: Vec::new(),
                    window_used: request.window.clone(),
                    lodging_only_fallback: false,
                    message: format!("La búsqueda no pudo completarse: {e}"),
                }
            }
        }
    }
}

pub struct QuoteService {
    queue: JobQueue<SearchRequest, SearchOutcome>,
}

impl QuoteService {
    /// Wire the orchestrator to a fresh single-flight queue.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<P>(driver: P, config: QuoteConfig) -> Self
    where
        P: PageAutomation + 'static,
    {
        let orchestrator = SearchRetryOrchestrator::new(driver, config);
        let queue = JobQueue::spawn(SearchWorker { orchestrator });
        Self { queue }
    }

    /// Validate, plan the window, and queue the search.
    ///
    /// Validation failures return immediately, before anything is queued or
    /// any collaborator call happens. Queued jobs run single-flight in
    /// submission order.
    pub async fn submit_search(&self, submit: SubmitSearch) -> Result<SearchOutcome, SearchError> {
        let passengers =
            PassengerConfig::new(submit.adults, submit.minor_count, &submit.minor_ages)?;
        let today = chrono::Local::now().date_naive();
        let window = plan_window(submit.start, submit.end, submit.transport, today)?;

        let advisory = passengers.split_advisory();
        let request = SearchRequest {
            destination: submit.destination,
            window,
            passengers,
            plan: submit.plan,
            budget_per_adult: submit.budget_per_adult,
            desired_hotel: submit.desired_hotel,
        };

        let mut outcome = self
            .queue
            .submit(request)
            .await
            .map_err(|_| SearchError::QueueClosed)?;
        if let Some(advisory) = advisory {
            outcome.message.push(' ');
            outcome.message.push_str(advisory);
        }
        Ok(outcome)
    }
}
