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

//! # Replay Driver
//!
//! A `PageAutomation` implementation that serves canned offers instead of
//! driving a browser. Two modes:
//!
//! - offer-set mode: always answers with the fixed set for the requested
//!   occupancy variant (CLI replay of captured fixtures);
//! - scripted mode: consumes one queued response per search call, answering
//!   with no availability once drained (phase tests).
//!
//! Every call is recorded for assertions.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use async_trait::async_trait;

use crate::date_windows::DateWindow;
use crate::errors::CollaboratorError;
use crate::offers::{RawOffer, SourceVariant};
use crate::page_automation::{PageAutomation, SearchQuery};

pub type ScriptedResponse = Result<Vec<RawOffer>, CollaboratorError>;

#[derive(Default)]
pub struct ReplayDriver {
    adults_only: Vec<RawOffer>,
    with_minors: Vec<RawOffer>,
    script: Mutex<VecDeque<ScriptedResponse>>,
    searches: Mutex<Vec<SearchQuery>>,
    date_edits: Mutex<Vec<DateWindow>>,
}

impl ReplayDriver {
    /// Offer-set mode: every search answers with the set matching the
    /// requested variant.
    pub fn with_offer_sets(adults_only: Vec<RawOffer>, with_minors: Vec<RawOffer>) -> Self {
        Self {
            adults_only,
            with_minors,
            ..Default::default()
        }
    }

    /// Scripted mode: responses are consumed one per `perform_search` call.
    pub fn scripted(responses: Vec<ScriptedResponse>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            ..Default::default()
        }
    }

    /// Load offer sets from JSON files holding `RawOffer` arrays.
    pub fn from_fixture_files(adults: &Path, minors: Option<&Path>) -> anyhow::Result<Self> {
        let adults_only = read_offers(adults)?;
        let with_minors = minors.map(read_offers).transpose()?.unwrap_or_default();
        Ok(Self::with_offer_sets(adults_only, with_minors))
    }

    pub fn recorded_searches(&self) -> Vec<SearchQuery> {
        self.searches.lock().expect("searches lock").clone()
    }

    pub fn recorded_date_edits(&self) -> Vec<DateWindow> {
        self.date_edits.lock().expect("date edits lock").clone()
    }
}

fn read_offers(path: &Path) -> anyhow::Result<Vec<RawOffer>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading offer fixture {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("parsing offer fixture {}", path.display()))
}

#[async_trait]
impl PageAutomation for ReplayDriver {
    async fn perform_search(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<RawOffer>, CollaboratorError> {
        self.searches.lock().expect("searches lock").push(query.clone());
        if let Some(response) = self.script.lock().expect("script lock").pop_front() {
            return response;
        }
        let offers = match query.variant {
            SourceVariant::AdultsOnly => self.adults_only.clone(),
            SourceVariant::WithMinors => self.with_minors.clone(),
        };
        Ok(offers)
    }

    async fn edit_search_dates(&self, window: &DateWindow) -> Result<(), CollaboratorError> {
        self.date_edits
            .lock()
            .expect("date edits lock")
            .push(window.clone());
        Ok(())
    }
}
