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

// Library for brisa-quote-agent
// Search retry & offer correlation engine for charter package quoting

mod config;
mod correlation;
mod date_windows;
mod errors;
mod message_format;
mod offers;
mod orchestrator;
mod page_automation;
mod passengers;
mod promotions;
mod replay;
mod service;
mod text;

// Re-export configuration
pub use config::{CorrelationConfig, QuoteConfig};

// Re-export the correlation engine
pub use correlation::OfferCorrelationEngine;

// Re-export date window planning
pub use date_windows::{DateWindow, TransportMode, plan_window, weekly_scan_windows};

// Re-export the error taxonomy
pub use errors::{CollaboratorError, DateWindowError, PassengerError, SearchError};

// Re-export message formatting
pub use message_format::{offer_block, outcome_summary};

// Re-export the offer data model
pub use offers::{CorrelatedOffer, Plan, RawOffer, SearchOutcome, SearchRequest, SourceVariant};

// Re-export the retry orchestrator
pub use orchestrator::{SearchPhase, SearchRetryOrchestrator};

// Re-export the page automation boundary
pub use page_automation::{PageAutomation, SearchQuery};

// Re-export passenger validation
pub use passengers::PassengerConfig;

// Re-export promotion classification
pub use promotions::{
    FareType, PromotionCatalog, PromotionClassifier, RankedOffers, filter_non_refundable,
};

// Re-export the replay driver
pub use replay::{ReplayDriver, ScriptedResponse};

// Re-export the quote service
pub use service::{QuoteService, SubmitSearch};
