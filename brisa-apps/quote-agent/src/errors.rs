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

//! # Error Taxonomy
//!
//! Typed failures for the validation, planning, and search layers.
//! Validation errors fail fast before any collaborator call; collaborator
//! failures are absorbed by the retry phases, and only full exhaustion
//! surfaces, rendered as a structured outcome by the service layer.

use std::time::Duration;

use chrono::NaiveDate;
use thiserror::Error;

/// Occupancy validation rejections. User-visible, hence Spanish.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PassengerError {
    #[error(
        "pasajeros fuera de rango: {adults} adultos y {minors} menores (se admiten 1-8 adultos y 0-4 menores)"
    )]
    InvalidPassengerCount { adults: u32, minors: u32 },
    #[error("se esperaban {expected} edades de menores y llegaron {got}")]
    AgeCountMismatch { expected: u32, got: usize },
    #[error("edad de menor inválida: {age} (debe estar entre 0 y 17)")]
    InvalidAge { age: i64 },
}

/// Date range rejections, raised before any collaborator call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateWindowError {
    #[error("rango de fechas inválido {start} a {end}: {reason}")]
    InvalidDateRange {
        start: NaiveDate,
        end: NaiveDate,
        reason: String,
    },
}

/// Failures reported by the page-automation collaborator.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("page automation timed out after {0:?}")]
    Timeout(Duration),
    #[error("site reported no availability")]
    NoAvailability,
    #[error("page automation failed")]
    Automation(#[source] anyhow::Error),
}

/// Top-level search failure as seen by the caller of the service.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Passenger(#[from] PassengerError),
    #[error(transparent)]
    DateWindow(#[from] DateWindowError),
    #[error("search queue closed before the job could run")]
    QueueClosed,
    #[error("sin disponibilidad tras agotar todas las fases: {}", .attempted.join(", "))]
    Exhausted { attempted: Vec<String> },
}
