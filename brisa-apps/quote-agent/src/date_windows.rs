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

//! # Date Window Planning
//!
//! Builds and adjusts candidate date windows. Charter buses only depart on
//! Thursdays and Sundays, so a ground window must start and end on one of
//! those weekdays; any other request is shifted forward onto the nearest
//! valid boundary. All functions are pure: effectful callers pass `today`
//! in (`chrono::Local::now().date_naive()`).

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::errors::DateWindowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Ground,
    Air,
    None,
}

impl TransportMode {
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ground" | "bus" | "terrestre" => Some(TransportMode::Ground),
            "air" | "flight" | "aereo" | "aéreo" => Some(TransportMode::Air),
            "none" | "sin_transporte" | "lodging" => Some(TransportMode::None),
            _ => None,
        }
    }

    pub fn as_str_name(&self) -> &'static str {
        match self {
            TransportMode::Ground => "ground",
            TransportMode::Air => "air",
            TransportMode::None => "none",
        }
    }
}

fn is_boundary(day: Weekday) -> bool {
    matches!(day, Weekday::Thu | Weekday::Sun)
}

/// Forward distance in days to the nearest Thursday or Sunday, zero when
/// already on a boundary.
fn days_to_boundary(day: Weekday) -> i64 {
    if is_boundary(day) {
        return 0;
    }
    let w = i64::from(day.num_days_from_monday());
    let to_thu = (3 - w).rem_euclid(7);
    let to_sun = (6 - w).rem_euclid(7);
    to_thu.min(to_sun)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub nights: i64,
    pub transport: TransportMode,
    pub adjusted: bool,
    pub adjustment_note: Option<String>,
}

impl DateWindow {
    /// Whether the endpoint weekday pair is valid for the transport mode.
    /// For ground transport every Thursday/Sunday combination is valid
    /// (Thu→Sun, Sun→Thu, Thu→Thu, Sun→Sun); other modes have no pattern.
    pub fn pattern_valid(&self) -> bool {
        match self.transport {
            TransportMode::Ground => {
                is_boundary(self.start.weekday()) && is_boundary(self.end.weekday())
            }
            TransportMode::Air | TransportMode::None => true,
        }
    }

    /// Forward-shift the whole window by `k` weeks. The weekday pattern and
    /// night count are preserved by construction.
    pub fn shift_weeks(&self, k: u32) -> DateWindow {
        let shift = Duration::days(7 * i64::from(k));
        DateWindow {
            start: self.start + shift,
            end: self.end + shift,
            nights: self.nights,
            transport: self.transport,
            adjusted: true,
            adjustment_note: Some(format!(
                "fechas desplazadas {k} semana(s) por falta de disponibilidad"
            )),
        }
    }

    /// Same dates with transport removed, for the lodging-only fallback.
    pub fn without_transport(&self) -> DateWindow {
        DateWindow {
            transport: TransportMode::None,
            ..self.clone()
        }
    }
}

/// Build the initial window for a requested raw range.
///
/// Ground windows get shifted forward onto Thursday/Sunday boundaries,
/// minimizing the total day shift and preferring the requested trip length.
/// Planning an already-valid window returns it unchanged (`adjusted = false`).
pub fn plan_window(
    start: NaiveDate,
    end: NaiveDate,
    transport: TransportMode,
    today: NaiveDate,
) -> Result<DateWindow, DateWindowError> {
    let requested_nights = (end - start).num_days();
    if requested_nights <= 0 {
        return Err(DateWindowError::InvalidDateRange {
            start,
            end,
            reason: "la estancia debe ser de al menos una noche".into(),
        });
    }
    if start < today {
        return Err(DateWindowError::InvalidDateRange {
            start,
            end,
            reason: "la fecha de entrada ya ha pasado".into(),
        });
    }

    if transport != TransportMode::Ground {
        return Ok(DateWindow {
            start,
            end,
            nights: requested_nights,
            transport,
            adjusted: false,
            adjustment_note: None,
        });
    }

    let new_start = start + Duration::days(days_to_boundary(start.weekday()));
    let mut new_end = end + Duration::days(days_to_boundary(end.weekday()));
    if new_end <= new_start {
        // Both endpoints landed on the same boundary; rebuild the end from
        // the adjusted start with the pattern night count closest to the
        // request. Ties go to the longer stay.
        new_end = closest_pattern_end(new_start, requested_nights);
    }

    let adjusted = new_start != start || new_end != end;
    let adjustment_note = adjusted.then(|| {
        format!(
            "fechas ajustadas de {start} / {end} a {new_start} / {new_end} \
             (las salidas de bus son solo jueves y domingo)"
        )
    });
    Ok(DateWindow {
        start: new_start,
        end: new_end,
        nights: (new_end - new_start).num_days(),
        transport,
        adjusted,
        adjustment_note,
    })
}

fn closest_pattern_end(start: NaiveDate, requested_nights: i64) -> NaiveDate {
    let mut best: Option<(i64, i64)> = None; // (distance, nights)
    for nights in 1..=(requested_nights + 7) {
        let candidate = start + Duration::days(nights);
        if !is_boundary(candidate.weekday()) {
            continue;
        }
        let distance = (nights - requested_nights).abs();
        let better = match best {
            Option::None => true,
            Some((d, n)) => distance < d || (distance == d && nights > n),
        };
        if better {
            best = Some((distance, nights));
        }
    }
    // A Thursday or Sunday always falls within any 7-day span.
    let nights = best.map(|(_, n)| n).unwrap_or(7);
    start + Duration::days(nights)
}

/// Consecutive Thursday→Sunday windows for the weekly promotion scan.
///
/// Starts from the Thursday of the week containing `from` and spans `weeks`
/// weeks, skipping windows that already ended.
pub fn weekly_scan_windows(from: NaiveDate, weeks: u32, today: NaiveDate) -> Vec<DateWindow> {
    let offset = i64::from(from.weekday().num_days_from_monday()) - 3;
    let first_thursday = from - Duration::days(offset);
    (0..weeks)
        .map(|k| {
            let start = first_thursday + Duration::days(7 * i64::from(k));
            let end = start + Duration::days(3);
            DateWindow {
                start,
                end,
                nights: 3,
                transport: TransportMode::Ground,
                adjusted: false,
                adjustment_note: Option::None,
            }
        })
        .filter(|w| w.end >= today)
        .collect()
}
