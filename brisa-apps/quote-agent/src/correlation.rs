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

//! # Offer Correlation Engine
//!
//! The site only prices a fixed occupancy per query. To price minors, two
//! independent searches run (adults-only and adults+minors) and their rows
//! must be lined up again: no stable identifier survives across searches,
//! so rows are matched by a weighted text/price similarity over normalized
//! fields. Below the confidence threshold the engine never guesses a minors
//! price.

use std::collections::{HashMap, HashSet};

use crate::config::CorrelationConfig;
use crate::offers::{CorrelatedOffer, RawOffer};
use crate::passengers::PassengerConfig;
use crate::promotions::FareType;
use crate::text::{normalize, word_jaccard};

struct NormalizedOffer<'a> {
    offer: &'a RawOffer,
    title: String,
    room: String,
    promo: Option<String>,
}

impl<'a> NormalizedOffer<'a> {
    fn new(offer: &'a RawOffer) -> Self {
        Self {
            offer,
            title: normalize(&offer.title),
            room: normalize(&offer.room_description),
            promo: offer.promo_label.as_deref().map(normalize),
        }
    }
}

pub struct OfferCorrelationEngine {
    config: CorrelationConfig,
}

impl OfferCorrelationEngine {
    pub fn new(config: CorrelationConfig) -> Self {
        Self { config }
    }

    /// Merge the two offer sets into per-person priced offers.
    ///
    /// `adults_only` is the reference set; each of its rows either finds a
    /// confident counterpart in `with_minors`, degrades to an adults-only
    /// offer (when no counterpart is needed), or is dropped.
    pub fn correlate(
        &self,
        adults_only: &[RawOffer],
        with_minors: &[RawOffer],
        passengers: &PassengerConfig,
    ) -> Vec<CorrelatedOffer> {
        let adults = passengers.adults();

        if !passengers.has_minors() {
            // Single-variant search, no correlation needed.
            return adults_only
                .iter()
                .map(|o| adults_only_offer(o, adults))
                .collect();
        }
        if with_minors.is_empty() {
            // The minors variant came back empty; degrade instead of guessing.
            tracing::debug!(
                count = adults_only.len(),
                "minors variant empty, degrading offers to adults-only pricing"
            );
            return adults_only
                .iter()
                .map(|o| adults_only_offer(o, adults))
                .collect();
        }

        let candidates: Vec<NormalizedOffer<'_>> =
            with_minors.iter().map(NormalizedOffer::new).collect();
        let mut index: HashMap<(&str, &str), Vec<usize>> = HashMap::new();
        for (i, candidate) in candidates.iter().enumerate() {
            index
                .entry((candidate.title.as_str(), candidate.room.as_str()))
                .or_default()
                .push(i);
        }

        let minor_count = passengers.minor_count();
        let mut correlated = Vec::new();
        for raw in adults_only {
            let reference = NormalizedOffer::new(raw);
            let key = (reference.title.as_str(), reference.room.as_str());
            let best = match index.get(&key) {
                Some(keyed) => self.best_candidate(&reference, &candidates, keyed.iter().copied()),
                None => self.best_candidate(&reference, &candidates, 0..candidates.len()),
            };
            match best {
                Some((score, matched)) if score >= self.config.confidence_threshold => {
                    correlated.push(matched_offer(raw, matched.offer, adults, minor_count, score));
                }
                best => {
                    let best_score = best.map(|(s, _)| s).unwrap_or(0.0);
                    tracing::debug!(
                        title = %raw.title,
                        room = %raw.room_description,
                        best_score,
                        threshold = self.config.confidence_threshold,
                        "correlation rejected, offer dropped without a minors price"
                    );
                }
            }
        }
        correlated
    }

    /// Best-scoring candidate from `pool`. Strict greater-than keeps the
    /// first-seen candidate on equal scores.
    fn best_candidate<'a, I>(
        &self,
        reference: &NormalizedOffer<'_>,
        candidates: &'a [NormalizedOffer<'a>],
        pool: I,
    ) -> Option<(f64, &'a NormalizedOffer<'a>)>
    where
        I: Iterator<Item = usize>,
    {
        let mut best: Option<(f64, &NormalizedOffer<'_>)> = None;
        for i in pool {
            let candidate = &candidates[i];
            let score = self.score(reference, candidate);
            if best.is_none_or(|(s, _)| score > s) {
                best = Some((score, candidate));
            }
        }
        best
    }

    /// Weighted similarity: title 0.40, room 0.35, promo label 0.15, price
    /// plausibility 0.10 under the default weights.
    fn score(&self, a: &NormalizedOffer<'_>, b: &NormalizedOffer<'_>) -> f64 {
        let c = &self.config;
        c.title_weight * title_similarity(&a.title, &b.title)
            + c.room_weight * self.room_similarity(&a.room, &b.room)
            + c.promo_weight * promo_similarity(a.promo.as_deref(), b.promo.as_deref())
            + c.price_weight * self.price_plausibility(a.offer.price, b.offer.price)
    }

    fn room_similarity(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 1.0;
        }
        if !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a)) {
            return 0.8;
        }
        let keyword_hits = |room: &str| -> HashSet<&str> {
            self.config
                .room_keywords
                .iter()
                .map(String::as_str)
                .filter(|k| room.contains(k))
                .collect()
        };
        let hits_a = keyword_hits(a);
        let hits_b = keyword_hits(b);
        let total = hits_a.union(&hits_b).count();
        if total == 0 {
            return 0.0;
        }
        hits_a.intersection(&hits_b).count() as f64 / total as f64
    }

    /// Full credit scaled by `1 − relative_delta` while the two prices stay
    /// within tolerance of the adults-only price, zero beyond it.
    fn price_plausibility(&self, price_a: f64, price_b: f64) -> f64 {
        if price_a <= 0.0 {
            return 0.0;
        }
        let delta = ((price_b - price_a) / price_a).abs();
        if delta <= self.config.price_tolerance {
            1.0 - delta
        } else {
            0.0
        }
    }
}

fn title_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        1.0
    } else if !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a)) {
        0.7
    } else {
        word_jaccard(a, b)
    }
}

fn promo_similarity(a: Option<&str>, b: Option<&str>) -> f64 {
    match (a, b) {
        (None, None) => 1.0,
        (Some(a), Some(b)) if a == b => 1.0,
        (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a)) => {
            0.7
        }
        _ => 0.0,
    }
}

fn adults_only_offer(raw: &RawOffer, adults: u32) -> CorrelatedOffer {
    CorrelatedOffer {
        id: raw.id.clone(),
        title: raw.title.clone(),
        room_description: raw.room_description.clone(),
        promo_label: raw.promo_label.clone(),
        refundable: raw.refundable,
        price_per_adult: (raw.price / f64::from(adults)).round(),
        price_per_minor_average: 0.0,
        total_price: raw.price,
        fare_type: FareType::Standard,
        correlation_confidence: 1.0,
        promotions: Vec::new(),
        promotion_score: 0,
    }
}

fn matched_offer(
    a: &RawOffer,
    b: &RawOffer,
    adults: u32,
    minors: u32,
    confidence: f64,
) -> CorrelatedOffer {
    let total_delta = b.price - a.price;
    CorrelatedOffer {
        id: b.id.clone(),
        title: b.title.clone(),
        room_description: b.room_description.clone(),
        promo_label: b.promo_label.clone(),
        refundable: b.refundable,
        price_per_adult: (a.price / f64::from(adults)).round(),
        price_per_minor_average: (total_delta / f64::from(minors)).round(),
        total_price: b.price,
        fare_type: FareType::Standard,
        correlation_confidence: confidence,
        promotions: Vec::new(),
        promotion_score: 0,
    }
}
