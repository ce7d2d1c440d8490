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

//! # Configuration
//!
//! Immutable configuration passed into each component at construction. The
//! option names of the original deployment (`maxDateWindows`,
//! `nonRefundableGraceDays`, `maxPromociones`, `maxOpcionesBaratas`,
//! `correlationConfidenceThreshold`) are accepted as serde aliases so an
//! operator's existing JSON keeps working.

use std::time::Duration;

use serde::Deserialize;

use brisa_search_queues::RetryPolicy;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    /// Forward-shifted retry depth in weeks.
    #[serde(alias = "maxDateWindows")]
    pub max_date_windows: u32,
    /// Non-refundable offers are dropped when the trip starts further away
    /// than this many days; `None` disables the filter.
    #[serde(alias = "nonRefundableGraceDays")]
    pub non_refundable_grace_days: Option<u32>,
    #[serde(alias = "maxPromociones")]
    pub max_promociones: usize,
    #[serde(alias = "maxOpcionesBaratas")]
    pub max_opciones_baratas: usize,
    /// Seconds the orchestrator waits on a single collaborator call.
    #[serde(alias = "phaseTimeoutSecs")]
    pub phase_timeout_secs: u64,
    #[serde(skip)]
    pub retry: RetryPolicy,
    pub correlation: CorrelationConfig,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            max_date_windows: 3,
            non_refundable_grace_days: Some(14),
            max_promociones: 5,
            max_opciones_baratas: 5,
            phase_timeout_secs: 90,
            retry: RetryPolicy::default(),
            correlation: CorrelationConfig::default(),
        }
    }
}

impl QuoteConfig {
    pub fn phase_timeout(&self) -> Duration {
        Duration::from_secs(self.phase_timeout_secs)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// Weights and thresholds for the offer correlation score.
/// The four weights sum to 1.0.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    pub title_weight: f64,
    pub room_weight: f64,
    pub promo_weight: f64,
    pub price_weight: f64,
    /// Minimum weighted score for two offers to count as the same room.
    #[serde(alias = "correlationConfidenceThreshold")]
    pub confidence_threshold: f64,
    /// Maximum relative price delta still considered plausible.
    pub price_tolerance: f64,
    /// Room keywords granting partial credit when descriptions differ.
    pub room_keywords: Vec<String>,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            title_weight: 0.40,
            room_weight: 0.35,
            promo_weight: 0.15,
            price_weight: 0.10,
            confidence_threshold: 0.85,
            price_tolerance: 0.30,
            room_keywords: [
                "vista", "mar", "ocean", "deluxe", "junior", "suite", "standard", "double",
                "king", "queen",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}
