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

//! # Offer Data Model
//!
//! Value objects flowing through one search execution: raw rows as returned
//! by the page automation, correlated per-person priced offers, and the
//! terminal outcome handed back to the messaging layer. Everything here is
//! created, transformed, and dropped within a single search.

use serde::{Deserialize, Serialize};

use crate::date_windows::DateWindow;
use crate::passengers::PassengerConfig;
use crate::promotions::FareType;

/// Which occupancy was declared for the search that produced an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceVariant {
    AdultsOnly,
    WithMinors,
}

/// Board/package plan selected on the search form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    SoloAlojamiento,
    Desayuno,
    MediaPension,
    PensionCompleta,
    TodoIncluido,
}

impl Plan {
    pub fn from_str_name(s: &str) -> Option<Self> {
        let lower = s.to_lowercase().replace('-', "_");
        match lower.as_str() {
            "solo_alojamiento" | "alojamiento" | "room_only" | "sa" => Some(Plan::SoloAlojamiento),
            "desayuno" | "alojamiento_desayuno" | "breakfast" | "ad" => Some(Plan::Desayuno),
            "media_pension" | "half_board" | "mp" => Some(Plan::MediaPension),
            "pension_completa" | "full_board" | "pc" => Some(Plan::PensionCompleta),
            "todo_incluido" | "all_inclusive" | "ti" => Some(Plan::TodoIncluido),
            _ => None,
        }
    }

    pub fn as_str_name(&self) -> &'static str {
        match self {
            Plan::SoloAlojamiento => "solo_alojamiento",
            Plan::Desayuno => "desayuno",
            Plan::MediaPension => "media_pension",
            Plan::PensionCompleta => "pension_completa",
            Plan::TodoIncluido => "todo_incluido",
        }
    }
}

/// One row scraped from the results page; read-only once received.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RawOffer {
    pub id: String,
    pub title: String,
    pub room_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_label: Option<String>,
    pub price: f64,
    pub refundable: bool,
    pub variant: SourceVariant,
}

/// A per-person priced offer produced by correlating the two occupancy
/// variants (or a single variant when no minors were requested).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CorrelatedOffer {
    pub id: String,
    pub title: String,
    pub room_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_label: Option<String>,
    pub refundable: bool,
    pub price_per_adult: f64,
    /// Aggregate average across all minors; the site returns one total
    /// price, so no per-age attribution is possible.
    pub price_per_minor_average: f64,
    pub total_price: f64,
    pub fare_type: FareType,
    pub correlation_confidence: f64,
    pub promotions: Vec<String>,
    pub promotion_score: i64,
}

impl CorrelatedOffer {
    /// Concatenated text fields, the classifier input.
    pub fn full_text(&self) -> String {
        let mut text = format!("{} {}", self.title, self.room_description);
        if let Some(label) = &self.promo_label {
            text.push(' ');
            text.push_str(label);
        }
        text
    }
}

/// A queued search request; everything the orchestrator needs for one run.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub destination: String,
    pub window: DateWindow,
    pub passengers: PassengerConfig,
    pub plan: Plan,
    pub budget_per_adult: Option<f64>,
    pub desired_hotel: Option<String>,
}

/// Terminal result of one retry cycle.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub success: bool,
    pub offers: Vec<CorrelatedOffer>,
    pub window_used: DateWindow,
    pub lodging_only_fallback: bool,
    pub message: String,
}
