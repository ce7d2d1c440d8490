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

//! # Page Automation Boundary
//!
//! The browser session is an external collaborator. Everything the retry
//! core needs from it fits in two operations: run a search for one occupancy
//! variant, and re-enter dates on the already-loaded form. DOM selectors,
//! waits, and fallback chains stay behind this trait; the retry core never
//! touches the page.

use std::sync::Arc;

use async_trait::async_trait;

use crate::date_windows::DateWindow;
use crate::errors::CollaboratorError;
use crate::offers::{Plan, RawOffer, SourceVariant};

/// One search submission: destination, window, occupancy variant, plan.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub destination: String,
    pub window: DateWindow,
    pub adults: u32,
    /// Empty for the adults-only variant.
    pub minor_ages: Vec<u8>,
    pub plan: Plan,
    pub variant: SourceVariant,
}

#[async_trait]
pub trait PageAutomation: Send + Sync {
    /// Drive a full search and return the raw offer rows. An empty list and
    /// `CollaboratorError::NoAvailability` both mean the site had nothing
    /// for these parameters.
    async fn perform_search(&self, query: &SearchQuery)
    -> Result<Vec<RawOffer>, CollaboratorError>;

    /// Atomic edit-and-resubmit of the date fields on the loaded form, used
    /// by the forward-week retry phases.
    async fn edit_search_dates(&self, window: &DateWindow) -> Result<(), CollaboratorError>;
}

#[async_trait]
impl<T: PageAutomation + ?Sized> PageAutomation for Arc<T> {
    async fn perform_search(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<RawOffer>, CollaboratorError> {
        (**self).perform_search(query).await
    }

    async fn edit_search_dates(&self, window: &DateWindow) -> Result<(), CollaboratorError> {
        (**self).edit_search_dates(window).await
    }
}
