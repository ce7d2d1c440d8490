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

//! # Message Formatting
//!
//! Pre-formatted Spanish text blocks for the messaging layer: one block per
//! offer plus an outcome summary. The core stays agnostic to the delivery
//! mechanism.

use std::fmt::Write as _;

use crate::offers::{CorrelatedOffer, SearchOutcome};
use crate::passengers::PassengerConfig;

/// One text block per offer, in the sales-chat format.
pub fn offer_block(offer: &CorrelatedOffer, passengers: &PassengerConfig) -> String {
    let mut block = format!("🏨 {} — {}\n", offer.title, offer.room_description);
    let _ = write!(
        block,
        "💶 Total {:.0} € | {:.0} € por adulto ({})",
        offer.total_price,
        offer.price_per_adult,
        passengers.adults()
    );
    if passengers.has_minors() && offer.price_per_minor_average > 0.0 {
        let _ = write!(
            block,
            " | {:.0} € por menor ({})",
            offer.price_per_minor_average,
            passengers.minor_count()
        );
    }
    let _ = write!(block, "\n🏷️ Tarifa: {}", offer.fare_type.display_es());
    if !offer.promotions.is_empty() {
        let _ = write!(block, "\n🎁 Promociones: {}", offer.promotions.join(", "));
    }
    block
}

/// Summary block for the whole outcome.
pub fn outcome_summary(outcome: &SearchOutcome) -> String {
    let mut summary = String::new();
    if outcome.success {
        let _ = writeln!(
            summary,
            "✅ {} oferta(s) del {} al {}.",
            outcome.offers.len(),
            outcome.window_used.start,
            outcome.window_used.end
        );
    } else {
        summary.push_str("❌ Búsqueda sin resultados.\n");
    }
    if outcome.lodging_only_fallback {
        summary.push_str("⚠️ Disponibilidad solo de alojamiento, sin transporte ni vuelo.\n");
    }
    summary.push_str(&outcome.message);
    summary
}
