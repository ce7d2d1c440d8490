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

//! # Passenger Configuration
//!
//! Validated occupancy for a package search. The site prices a fixed
//! occupancy per query, so the configuration is frozen once validated and
//! reused verbatim for both occupancy variants.

use serde::Serialize;

use crate::errors::PassengerError;

pub const MIN_ADULTS: u32 = 1;
pub const MAX_ADULTS: u32 = 8;
pub const MAX_MINORS: u32 = 4;
pub const MAX_MINOR_AGE: i64 = 17;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassengerConfig {
    adults: u32,
    minor_ages: Vec<u8>,
}

impl PassengerConfig {
    /// Validate raw counts and ages into a frozen configuration.
    pub fn new(adults: u32, minor_count: u32, ages: &[i64]) -> Result<Self, PassengerError> {
        if !(MIN_ADULTS..=MAX_ADULTS).contains(&adults) || minor_count > MAX_MINORS {
            return Err(PassengerError::InvalidPassengerCount {
                adults,
                minors: minor_count,
            });
        }
        if ages.len() != minor_count as usize {
            return Err(PassengerError::AgeCountMismatch {
                expected: minor_count,
                got: ages.len(),
            });
        }
        if let Some(&age) = ages.iter().find(|&&a| !(0..=MAX_MINOR_AGE).contains(&a)) {
            return Err(PassengerError::InvalidAge { age });
        }
        let config = Self {
            adults,
            minor_ages: ages.iter().map(|&a| a as u8).collect(),
        };
        if let Some(advisory) = config.split_advisory() {
            tracing::warn!("{advisory}");
        }
        Ok(config)
    }

    pub fn adults(&self) -> u32 {
        self.adults
    }

    pub fn minor_ages(&self) -> &[u8] {
        &self.minor_ages
    }

    pub fn minor_count(&self) -> u32 {
        self.minor_ages.len() as u32
    }

    pub fn has_minors(&self) -> bool {
        !self.minor_ages.is_empty()
    }

    /// Correlating four minors against a single aggregate price difference
    /// is imprecise; recommend splitting, never reject.
    pub fn split_advisory(&self) -> Option<&'static str> {
        (self.minor_count() == MAX_MINORS).then_some(
            "Con 4 menores la correlación de precios pierde precisión; \
             conviene dividir la búsqueda en dos de 2 adultos y 2 menores.",
        )
    }
}
