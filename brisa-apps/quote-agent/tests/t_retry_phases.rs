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

//! Retry state machine phases against a scripted driver.
//!
//! Run with:
//!     cargo test --test t_retry_phases

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use brisa_quote_agent::{
    CollaboratorError, PassengerConfig, Plan, QuoteConfig, RawOffer, ReplayDriver,
    SearchError, SearchRequest, SearchRetryOrchestrator, SourceVariant, TransportMode,
    plan_window,
};
use brisa_search_queues::RetryPolicy;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2026, 9, 1)
}

fn test_config() -> QuoteConfig {
    QuoteConfig {
        retry: RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            jitter_factor: 0.0,
        },
        phase_timeout_secs: 5,
        ..QuoteConfig::default()
    }
}

fn raw_offer(id: &str, price: f64, variant: SourceVariant) -> RawOffer {
    RawOffer {
        id: id.into(),
        title: "Hotel Sol".into(),
        room_description: "Vista al Mar Deluxe".into(),
        promo_label: None,
        price,
        refundable: true,
        variant,
    }
}

/// Thursday → Sunday, ground transport.
fn ground_request(passengers: PassengerConfig) -> SearchRequest {
    let window = plan_window(
        date(2026, 9, 17),
        date(2026, 9, 20),
        TransportMode::Ground,
        today(),
    )
    .unwrap();
    SearchRequest {
        destination: "Riviera Maya".into(),
        window,
        passengers,
        plan: Plan::MediaPension,
        budget_per_adult: None,
        desired_hotel: None,
    }
}

fn couple() -> PassengerConfig {
    PassengerConfig::new(2, 0, &[]).unwrap()
}

#[tokio::test]
async fn test_success_on_second_forward_week() {
    // Scenario: original empty, week 1 empty, week 2 has availability.
    let driver = Arc::new(ReplayDriver::scripted(vec![
        Ok(vec![]),
        Ok(vec![]),
        Ok(vec![raw_offer("of-1", 8000.0, SourceVariant::AdultsOnly)]),
    ]));
    let orchestrator = SearchRetryOrchestrator::new(driver.clone(), test_config());

    let outcome = orchestrator
        .run(&ground_request(couple()), today())
        .await
        .unwrap();

    assert!(outcome.success);
    assert!(!outcome.lodging_only_fallback);
    assert_eq!(outcome.window_used.start, date(2026, 10, 1));
    assert_eq!(outcome.window_used.end, date(2026, 10, 4));
    assert_eq!(outcome.offers.len(), 1);

    // One search per phase (no minors), and a date re-entry per week retry.
    assert_eq!(driver.recorded_searches().len(), 3);
    let edits = driver.recorded_date_edits();
    assert_eq!(edits.len(), 2);
    assert_eq!(edits[0].start, date(2026, 9, 24));
    assert_eq!(edits[1].start, date(2026, 10, 1));
}

#[tokio::test]
async fn test_lodging_only_fallback_after_empty_weeks() {
    // Scenario: every dated phase empty, lodging-only finds rooms.
    let driver = Arc::new(ReplayDriver::scripted(vec![
        Ok(vec![]),
        Ok(vec![]),
        Ok(vec![]),
        Ok(vec![]),
        Ok(vec![raw_offer("of-1", 6400.0, SourceVariant::AdultsOnly)]),
    ]));
    let orchestrator = SearchRetryOrchestrator::new(driver.clone(), test_config());

    let outcome = orchestrator
        .run(&ground_request(couple()), today())
        .await
        .unwrap();

    assert!(outcome.success);
    assert!(outcome.lodging_only_fallback);
    // Back on the original dates, transport stripped.
    assert_eq!(outcome.window_used.start, date(2026, 9, 17));
    assert_eq!(outcome.window_used.transport, TransportMode::None);
    assert!(outcome.message.contains("sin transporte"));

    // Three week edits plus the revert for the lodging pass.
    assert_eq!(driver.recorded_date_edits().len(), 4);
    assert_eq!(driver.recorded_searches().len(), 5);
}

#[tokio::test]
async fn test_exhausted_after_every_phase() {
    let driver = Arc::new(ReplayDriver::scripted(vec![]));
    let orchestrator = SearchRetryOrchestrator::new(driver.clone(), test_config());

    let result = orchestrator.run(&ground_request(couple()), today()).await;
    let Err(SearchError::Exhausted { attempted }) = result else {
        panic!("expected exhaustion, got {result:?}");
    };
    assert_eq!(
        attempted,
        vec![
            "fechas solicitadas",
            "+1 semana(s)",
            "+2 semana(s)",
            "+3 semana(s)",
            "solo alojamiento",
        ]
    );
    assert_eq!(driver.recorded_searches().len(), 5);
}

#[tokio::test]
async fn test_no_transport_skips_forward_weeks() {
    let driver = Arc::new(ReplayDriver::scripted(vec![
        Ok(vec![]),
        Ok(vec![raw_offer("of-1", 6400.0, SourceVariant::AdultsOnly)]),
    ]));
    let window = plan_window(
        date(2026, 9, 15),
        date(2026, 9, 19),
        TransportMode::None,
        today(),
    )
    .unwrap();
    let request = SearchRequest {
        destination: "Riviera Maya".into(),
        window,
        passengers: couple(),
        plan: Plan::SoloAlojamiento,
        budget_per_adult: None,
        desired_hotel: None,
    };
    let orchestrator = SearchRetryOrchestrator::new(driver.clone(), test_config());

    let outcome = orchestrator.run(&request, today()).await.unwrap();
    assert!(outcome.success);
    assert!(outcome.lodging_only_fallback);
    // Straight from the original phase to lodging-only: two searches, and no
    // date re-entry because the form never moved.
    assert_eq!(driver.recorded_searches().len(), 2);
    assert!(driver.recorded_date_edits().is_empty());
}

#[tokio::test]
async fn test_transient_automation_failures_are_retried_within_a_phase() {
    let driver = Arc::new(ReplayDriver::scripted(vec![
        Err(CollaboratorError::Automation(anyhow::anyhow!(
            "stale element reference"
        ))),
        Ok(vec![raw_offer("of-1", 8000.0, SourceVariant::AdultsOnly)]),
    ]));
    let orchestrator = SearchRetryOrchestrator::new(driver.clone(), test_config());

    let outcome = orchestrator
        .run(&ground_request(couple()), today())
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.window_used.start, date(2026, 9, 17));
    // Two calls inside the original phase, no date edits at all.
    assert_eq!(driver.recorded_searches().len(), 2);
    assert!(driver.recorded_date_edits().is_empty());
}

#[tokio::test]
async fn test_no_availability_is_not_retried_locally() {
    let driver = Arc::new(ReplayDriver::scripted(vec![
        Err(CollaboratorError::NoAvailability),
        Ok(vec![raw_offer("of-1", 8000.0, SourceVariant::AdultsOnly)]),
    ]));
    let orchestrator = SearchRetryOrchestrator::new(driver.clone(), test_config());

    let outcome = orchestrator
        .run(&ground_request(couple()), today())
        .await
        .unwrap();

    assert!(outcome.success);
    // The explicit no-availability answer fails the phase on the spot; the
    // second scripted response is consumed by the week-1 retry.
    assert_eq!(outcome.window_used.start, date(2026, 9, 24));
    assert_eq!(driver.recorded_searches().len(), 2);
    assert_eq!(driver.recorded_date_edits().len(), 1);
}

#[tokio::test]
async fn test_minors_trigger_both_occupancy_variants() {
    let family = PassengerConfig::new(2, 1, &[8]).unwrap();
    let driver = Arc::new(ReplayDriver::with_offer_sets(
        vec![raw_offer("of-a", 8000.0, SourceVariant::AdultsOnly)],
        vec![raw_offer("of-b", 9500.0, SourceVariant::WithMinors)],
    ));
    let orchestrator = SearchRetryOrchestrator::new(driver.clone(), test_config());

    let outcome = orchestrator
        .run(&ground_request(family), today())
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.offers.len(), 1);
    assert_eq!(outcome.offers[0].price_per_adult, 4000.0);
    assert_eq!(outcome.offers[0].price_per_minor_average, 1500.0);

    let searches = driver.recorded_searches();
    assert_eq!(searches.len(), 2);
    assert_eq!(searches[0].variant, SourceVariant::AdultsOnly);
    assert!(searches[0].minor_ages.is_empty());
    assert_eq!(searches[1].variant, SourceVariant::WithMinors);
    assert_eq!(searches[1].minor_ages, vec![8]);
}

#[tokio::test]
async fn test_far_future_non_refundable_offers_are_excluded() {
    let mut non_ref = raw_offer("of-nr", 5200.0, SourceVariant::AdultsOnly);
    non_ref.promo_label = Some("Tarifa no reembolsable".into());
    non_ref.refundable = false;
    let keep = raw_offer("of-ok", 8000.0, SourceVariant::AdultsOnly);
    let driver = Arc::new(ReplayDriver::with_offer_sets(vec![non_ref, keep], vec![]));
    let orchestrator = SearchRetryOrchestrator::new(driver, test_config());

    // The trip starts 16 days out, beyond the default 14-day grace.
    let outcome = orchestrator
        .run(&ground_request(couple()), today())
        .await
        .unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.offers.len(), 1);
    assert_eq!(outcome.offers[0].id, "of-ok");
}

#[tokio::test]
async fn test_adjusted_window_note_reaches_the_outcome_message() {
    // Tuesday → Friday request gets nudged onto Thursday → Sunday.
    let window = plan_window(
        date(2026, 9, 15),
        date(2026, 9, 18),
        TransportMode::Ground,
        today(),
    )
    .unwrap();
    assert!(window.adjusted);
    let request = SearchRequest {
        destination: "Riviera Maya".into(),
        window,
        passengers: couple(),
        plan: Plan::MediaPension,
        budget_per_adult: None,
        desired_hotel: None,
    };
    let driver = Arc::new(ReplayDriver::with_offer_sets(
        vec![raw_offer("of-a", 8000.0, SourceVariant::AdultsOnly)],
        vec![],
    ));
    let orchestrator = SearchRetryOrchestrator::new(driver.clone(), test_config());

    let outcome = orchestrator.run(&request, today()).await.unwrap();
    assert!(outcome.success);
    assert!(outcome.message.contains("fechas ajustadas"));
}
