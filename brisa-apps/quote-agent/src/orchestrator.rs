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

//! # Search Retry Orchestrator
//!
//! Drives one search to completion through progressively relaxed phases:
//! the requested window, up to three forward-shifted weeks, and a final
//! lodging-only pass on the original dates. Collaborator calls run under a
//! bounded timeout with a small linear-backoff retry budget; a phase that
//! exhausts its budget fails the phase, never the process.

use chrono::NaiveDate;
use tokio::time::timeout;

use brisa_search_queues::RetryError;

use crate::config::QuoteConfig;
use crate::correlation::OfferCorrelationEngine;
use crate::date_windows::{DateWindow, TransportMode};
use crate::errors::{CollaboratorError, SearchError};
use crate::offers::{CorrelatedOffer, RawOffer, SearchOutcome, SearchRequest, SourceVariant};
use crate::page_automation::{PageAutomation, SearchQuery};
use crate::promotions::{PromotionCatalog, PromotionClassifier, filter_non_refundable};
use crate::text::normalize;

/// The retry phases, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Original,
    ForwardWeek(u32),
    LodgingOnly,
}

impl SearchPhase {
    pub fn label_es(&self) -> String {
        match self {
            SearchPhase::Original => "fechas solicitadas".to_string(),
            SearchPhase::ForwardWeek(k) => format!("+{k} semana(s)"),
            SearchPhase::LodgingOnly => "solo alojamiento".to_string(),
        }
    }
}

pub struct SearchRetryOrchestrator<P> {
    driver: P,
    config: QuoteConfig,
    engine: OfferCorrelationEngine,
    classifier: PromotionClassifier,
}

impl<P: PageAutomation> SearchRetryOrchestrator<P> {
    pub fn new(driver: P, config: QuoteConfig) -> Self {
        let engine = OfferCorrelationEngine::new(config.correlation.clone());
        let classifier = PromotionClassifier::new(PromotionCatalog::default());
        Self {
            driver,
            config,
            engine,
            classifier,
        }
    }

    /// Run the full phase sequence for one request. `Err(Exhausted)` only
    /// after every phase failed; the service layer renders it as a
    /// structured outcome.
    pub async fn run(
        &self,
        request: &SearchRequest,
        today: NaiveDate,
    ) -> Result<SearchOutcome, SearchError> {
        let mut attempted: Vec<String> = Vec::new();

        let phase = SearchPhase::Original;
        tracing::info!(
            destination = %request.destination,
            start = %request.window.start,
            end = %request.window.end,
            "searching the requested window"
        );
        if let Some(offers) = self.try_phase(request, &request.window, false).await {
            return Ok(self.success(request, request.window.clone(), offers, false, today));
        }
        attempted.push(phase.label_es());

        if request.window.transport != TransportMode::None {
            for k in 1..=self.config.max_date_windows {
                let phase = SearchPhase::ForwardWeek(k);
                let shifted = request.window.shift_weeks(k);
                if !shifted.pattern_valid() {
                    tracing::warn!(week = k, "shifted window has an invalid pattern, phase skipped");
                    attempted.push(format!("{} (omitida)", phase.label_es()));
                    continue;
                }
                tracing::info!(week = k, start = %shifted.start, "retrying with a forward-shifted window");
                if let Some(offers) = self.try_phase(request, &shifted, true).await {
                    return Ok(self.success(request, shifted, offers, false, today));
                }
                attempted.push(phase.label_es());
            }
        }

        let phase = SearchPhase::LodgingOnly;
        let lodging = request.window.without_transport();
        // The form still shows the last shifted dates after week retries.
        let resubmit = request.window.transport != TransportMode::None;
        tracing::info!("final phase: lodging only on the original dates");
        if let Some(offers) = self.try_phase(request, &lodging, resubmit).await {
            return Ok(self.success(request, lodging, offers, true, today));
        }
        attempted.push(phase.label_es());

        Err(SearchError::Exhausted { attempted })
    }

    /// One phase: optional date re-entry, then one search per occupancy
    /// variant, then correlation. `None` means the phase failed (error,
    /// timeout, or no availability) and the state machine moves on.
    async fn try_phase(
        &self,
        request: &SearchRequest,
        window: &DateWindow,
        resubmit: bool,
    ) -> Option<Vec<CorrelatedOffer>> {
        if resubmit && !self.edit_dates(window).await {
            return None;
        }

        let adults_query = self.query(request, window, SourceVariant::AdultsOnly);
        let set_a = match self.search(&adults_query).await {
            Some(offers) if !offers.is_empty() => offers,
            _ => return None,
        };

        let set_b = if request.passengers.has_minors() {
            let minors_query = self.query(request, window, SourceVariant::WithMinors);
            self.search(&minors_query).await.unwrap_or_default()
        } else {
            Vec::new()
        };

        Some(self.engine.correlate(&set_a, &set_b, &request.passengers))
    }

    /// A collaborator search under the phase timeout and local retry budget.
    /// `Some(vec![])` is "no availability"; `None` is an exhausted phase.
    async fn search(&self, query: &SearchQuery) -> Option<Vec<RawOffer>> {
        let phase_timeout = self.config.phase_timeout();
        let driver = &self.driver;
        let result = self
            .config
            .retry
            .with_retry(move || async move {
                match timeout(phase_timeout, driver.perform_search(query)).await {
                    Err(_) => Err(anyhow::Error::new(CollaboratorError::Timeout(phase_timeout))),
                    Ok(Err(CollaboratorError::NoAvailability)) => Ok(Vec::new()),
                    Ok(Err(e)) => Err(anyhow::Error::new(e)),
                    Ok(Ok(offers)) => Ok(offers),
                }
            })
            .await;
        match result {
            Ok(offers) => Some(offers),
            Err(RetryError::Exhausted(e)) => {
                tracing::warn!(error = %e, variant = ?query.variant, "search failed after local retries");
                None
            }
        }
    }

    async fn edit_dates(&self, window: &DateWindow) -> bool {
        let phase_timeout = self.config.phase_timeout();
        let driver = &self.driver;
        let result = self
            .config
            .retry
            .with_retry(move || async move {
                match timeout(phase_timeout, driver.edit_search_dates(window)).await {
                    Err(_) => Err(anyhow::Error::new(CollaboratorError::Timeout(phase_timeout))),
                    Ok(Err(e)) => Err(anyhow::Error::new(e)),
                    Ok(Ok(())) => Ok(()),
                }
            })
            .await;
        match result {
            Ok(()) => true,
            Err(RetryError::Exhausted(e)) => {
                tracing::warn!(error = %e, "date re-entry failed after local retries, phase skipped");
                false
            }
        }
    }

    fn query(
        &self,
        request: &SearchRequest,
        window: &DateWindow,
        variant: SourceVariant,
    ) -> SearchQuery {
        let minor_ages = match variant {
            SourceVariant::AdultsOnly => Vec::new(),
            SourceVariant::WithMinors => request.passengers.minor_ages().to_vec(),
        };
        SearchQuery {
            destination: request.destination.clone(),
            window: window.clone(),
            adults: request.passengers.adults(),
            minor_ages,
            plan: request.plan,
            variant,
        }
    }

    /// Annotate, filter, and rank a successful phase's offers into the
    /// terminal outcome.
    fn success(
        &self,
        request: &SearchRequest,
        window: DateWindow,
        mut offers: Vec<CorrelatedOffer>,
        lodging_only: bool,
        today: NaiveDate,
    ) -> SearchOutcome {
        for offer in &mut offers {
            self.classifier.annotate(offer);
        }

        let offers = filter_non_refundable(
            offers,
            window.start,
            today,
            self.config.non_refundable_grace_days,
        );
        let offers = apply_budget(offers, request.budget_per_adult);
        let offers = apply_desired_hotel(offers, request.desired_hotel.as_deref());

        let ranked = self.classifier.rank(
            offers,
            self.config.max_promociones,
            self.config.max_opciones_baratas,
        );
        let offers = ranked.into_flat();

        let mut message = if lodging_only {
            format!(
                "Disponibilidad encontrada del {} al {} solo de alojamiento; \
                 se muestra sin transporte ni vuelo.",
                window.start, window.end
            )
        } else {
            format!(
                "Disponibilidad encontrada del {} al {}.",
                window.start, window.end
            )
        };
        if let Some(note) = &window.adjustment_note {
            message.push(' ');
            message.push_str(note);
            message.push('.');
        }
        if offers.is_empty() {
            message.push_str(
                " Ninguna oferta superó los filtros de correlación y presupuesto.",
            );
        }

        SearchOutcome {
            success: true,
            offers,
            window_used: window,
            lodging_only_fallback: lodging_only,
            message,
        }
    }
}

fn apply_budget(offers: Vec<CorrelatedOffer>, budget_per_adult: Option<f64>) -> Vec<CorrelatedOffer> {
    let Some(budget) = budget_per_adult else {
        return offers;
    };
    offers
        .into_iter()
        .filter(|o| o.price_per_adult <= budget)
        .collect()
}

/// Keep offers matching the requested hotel; when nothing matches, keep the
/// full list so the caller can propose alternatives.
fn apply_desired_hotel(
    offers: Vec<CorrelatedOffer>,
    desired: Option<&str>,
) -> Vec<CorrelatedOffer> {
    let Some(desired) = desired else {
        return offers;
    };
    let needle = normalize(desired);
    if needle.is_empty() {
        return offers;
    }
    let matches: Vec<CorrelatedOffer> = offers
        .iter()
        .filter(|o| normalize(&o.title).contains(&needle))
        .cloned()
        .collect();
    if matches.is_empty() { offers } else { matches }
}
