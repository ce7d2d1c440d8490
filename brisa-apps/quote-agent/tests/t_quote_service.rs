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

//! Inbound service surface: fail-fast validation, single-flight ordering,
//! structured failure outcomes.
//!
//! Run with:
//!     cargo test --test t_quote_service

use std::sync::Arc;

use chrono::Duration;

use brisa_quote_agent::{
    Plan, QuoteConfig, QuoteService, RawOffer, ReplayDriver, SearchError, SourceVariant,
    SubmitSearch, TransportMode,
};

fn raw_offer(id: &str, price: f64, variant: SourceVariant) -> RawOffer {
    RawOffer {
        id: id.into(),
        title: "Hotel Sol".into(),
        room_description: "Doble Standard".into(),
        promo_label: None,
        price,
        refundable: true,
        variant,
    }
}

fn submit(destination: &str) -> SubmitSearch {
    let today = chrono::Local::now().date_naive();
    SubmitSearch {
        destination: destination.into(),
        start: today + Duration::days(30),
        end: today + Duration::days(33),
        adults: 2,
        minor_count: 0,
        minor_ages: Vec::new(),
        transport: TransportMode::Air,
        plan: Plan::Desayuno,
        budget_per_adult: None,
        desired_hotel: None,
    }
}

#[tokio::test]
async fn test_validation_fails_fast_without_touching_the_driver() {
    let driver = Arc::new(ReplayDriver::with_offer_sets(
        vec![raw_offer("of-1", 6400.0, SourceVariant::AdultsOnly)],
        vec![],
    ));
    let service = QuoteService::spawn(driver.clone(), QuoteConfig::default());

    let mut bad_adults = submit("Riviera Maya");
    bad_adults.adults = 0;
    let result = service.submit_search(bad_adults).await;
    assert!(matches!(result, Err(SearchError::Passenger(_))));

    let mut bad_dates = submit("Riviera Maya");
    let today = chrono::Local::now().date_naive();
    bad_dates.start = today - Duration::days(5);
    bad_dates.end = today - Duration::days(2);
    let result = service.submit_search(bad_dates).await;
    assert!(matches!(result, Err(SearchError::DateWindow(_))));

    let mut bad_ages = submit("Riviera Maya");
    bad_ages.minor_count = 2;
    bad_ages.minor_ages = vec![9];
    let result = service.submit_search(bad_ages).await;
    assert!(matches!(result, Err(SearchError::Passenger(_))));

    assert!(
        driver.recorded_searches().is_empty(),
        "validation failures must never reach the collaborator"
    );
}

#[tokio::test]
async fn test_jobs_run_in_submission_order() {
    let driver = Arc::new(ReplayDriver::with_offer_sets(
        vec![raw_offer("of-1", 6400.0, SourceVariant::AdultsOnly)],
        vec![],
    ));
    let service = QuoteService::spawn(driver.clone(), QuoteConfig::default());

    // join! polls in order, so the submissions enqueue in order.
    let (a, b) = tokio::join!(
        service.submit_search(submit("Destino A")),
        service.submit_search(submit("Destino B")),
    );
    assert!(a.unwrap().success);
    assert!(b.unwrap().success);

    let destinations: Vec<String> = driver
        .recorded_searches()
        .into_iter()
        .map(|q| q.destination)
        .collect();
    assert_eq!(destinations, vec!["Destino A", "Destino B"]);
}

#[tokio::test]
async fn test_exhaustion_becomes_a_structured_failure() {
    let driver = Arc::new(ReplayDriver::with_offer_sets(vec![], vec![]));
    let service = QuoteService::spawn(driver, QuoteConfig::default());

    let outcome = service.submit_search(submit("Riviera Maya")).await.unwrap();
    assert!(!outcome.success);
    assert!(outcome.offers.is_empty());
    assert!(outcome.message.contains("Sin disponibilidad"));
    assert!(outcome.message.contains("solo alojamiento"));
}

#[tokio::test]
async fn test_four_minors_advisory_reaches_the_message() {
    let driver = Arc::new(ReplayDriver::with_offer_sets(
        vec![raw_offer("of-1", 9000.0, SourceVariant::AdultsOnly)],
        vec![raw_offer("of-2", 11000.0, SourceVariant::WithMinors)],
    ));
    let service = QuoteService::spawn(driver, QuoteConfig::default());

    let mut request = submit("Riviera Maya");
    request.minor_count = 4;
    request.minor_ages = vec![3, 6, 9, 12];
    let outcome = service.submit_search(request).await.unwrap();
    assert!(outcome.success);
    assert!(outcome.message.contains("dividir la búsqueda"));
}
