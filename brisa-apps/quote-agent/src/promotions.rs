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

//! # Promotion Classification
//!
//! Detects promotional attributes on a correlated offer, classifies its
//! fare terms, and ranks the final lists. Catalog phrases and score weights
//! live in an immutable catalog passed at construction; matching is case-
//! and diacritic-insensitive over the offer's concatenated text fields.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::offers::CorrelatedOffer;
use crate::text::normalize;

/// Cancellation/confirmation terms of an offer, separate from promotions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FareType {
    NonRefundable,
    OnRequest,
    ImmediateConfirmation,
    SpecialRate,
    Standard,
}

impl FareType {
    pub fn display_es(&self) -> &'static str {
        match self {
            FareType::NonRefundable => "No reembolsable",
            FareType::OnRequest => "Bajo petición",
            FareType::ImmediateConfirmation => "Confirmación inmediata",
            FareType::SpecialRate => "Tarifa especial",
            FareType::Standard => "Estándar",
        }
    }
}

// Ordered groups, first match wins. Non-refundable keywords go first, they
// are the most operationally significant. Phrases are in normalized form.
static FARE_KEYWORDS: &[(FareType, &[&str])] = &[
    (
        FareType::NonRefundable,
        &[
            "no reembolsable",
            "sin reembolso",
            "non refundable",
            "tarifa no reembolsable",
        ],
    ),
    (
        FareType::OnRequest,
        &["bajo peticion", "on request", "sujeto a disponibilidad"],
    ),
    (
        FareType::ImmediateConfirmation,
        &[
            "confirmacion inmediata",
            "confirmacion instantanea",
            "instant confirmation",
        ],
    ),
    (
        FareType::SpecialRate,
        &["tarifa especial", "oferta especial", "precio especial"],
    ),
];

// Heuristic matches independent of the fixed catalog.
static HEURISTICS: &[(&[&str], &str)] = &[
    (
        &["spa gratis", "free spa", "acceso gratuito al spa"],
        "Spa gratis",
    ),
    (
        &["wifi gratis", "free wifi", "wifi gratuito"],
        "WiFi gratis",
    ),
    (
        &["traslado gratis", "traslados gratis", "free shuttle", "shuttle gratuito"],
        "Traslado gratis",
    ),
    (
        &["cena gratis", "free dinner", "cena de gala incluida"],
        "Cena gratis",
    ),
];

static DISCOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2})\s*%\s*(?:de\s+)?(?:descuento|dto|discount|off)")
        .expect("discount regex")
});

/// Immutable promotion catalog: target phrases, canonical labels, and score
/// weights.
#[derive(Debug, Clone)]
pub struct PromotionCatalog {
    /// Normalized target phrase → canonical label.
    entries: Vec<(String, String)>,
    /// Canonical label → score weight.
    weights: Vec<(String, i64)>,
    default_weight: i64,
    multi_promo_bonus: i64,
}

impl Default for PromotionCatalog {
    fn default() -> Self {
        let entries = [
            ("garantia naturcharter", "Garantía NaturCharter"),
            ("menores gratis", "Menores gratis"),
            ("ninos gratis", "Menores gratis"),
            ("noches gratis", "Noches gratis"),
            (
                "entrega anticipada de la habitacion",
                "Entrega anticipada de la habitación",
            ),
            ("late checkout", "Late checkout"),
            ("salida tardia", "Late checkout"),
            ("mejora de regimen", "Mejora de régimen"),
            ("parking gratis", "Parking gratis"),
        ];
        let weights = [
            ("Menores gratis", 100),
            ("Noches gratis", 90),
            ("Garantía NaturCharter", 80),
            ("Entrega anticipada de la habitación", 60),
            ("Mejora de régimen", 50),
            ("Late checkout", 40),
            ("Cena gratis", 35),
            ("Spa gratis", 30),
            ("Traslado gratis", 25),
            ("Parking gratis", 20),
            ("WiFi gratis", 10),
        ];
        Self {
            entries: entries
                .iter()
                .map(|(p, l)| (p.to_string(), l.to_string()))
                .collect(),
            weights: weights.iter().map(|(l, w)| (l.to_string(), *w)).collect(),
            default_weight: 15,
            multi_promo_bonus: 5,
        }
    }
}

impl PromotionCatalog {
    fn weight_of(&self, label: &str) -> i64 {
        self.weights
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, w)| *w)
            .unwrap_or(self.default_weight)
    }
}

/// Final result lists: offers with promotions first, cheap plain offers after.
#[derive(Debug, Clone, Serialize)]
pub struct RankedOffers {
    pub promoted: Vec<CorrelatedOffer>,
    pub plain: Vec<CorrelatedOffer>,
}

impl RankedOffers {
    pub fn into_flat(self) -> Vec<CorrelatedOffer> {
        let mut all = self.promoted;
        all.extend(self.plain);
        all
    }
}

pub struct PromotionClassifier {
    catalog: PromotionCatalog,
}

impl PromotionClassifier {
    pub fn new(catalog: PromotionCatalog) -> Self {
        Self { catalog }
    }

    /// Canonical promotion labels found in `text`, deduplicated; catalog
    /// phrases first, heuristics after.
    pub fn classify(&self, text: &str) -> Vec<String> {
        let haystack = normalize(text);
        let mut labels: Vec<String> = Vec::new();
        for (phrase, label) in &self.catalog.entries {
            if haystack.contains(phrase.as_str()) && !labels.contains(label) {
                labels.push(label.clone());
            }
        }
        for (phrases, label) in HEURISTICS {
            if phrases.iter().any(|p| haystack.contains(p)) {
                let label = (*label).to_string();
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
        }
        if let Some(caps) = DISCOUNT_RE.captures(&haystack) {
            let label = format!("Descuento {}%", &caps[1]);
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        labels
    }

    /// First-match-wins over the ordered fare keyword groups.
    pub fn fare_type(&self, text: &str) -> FareType {
        let haystack = normalize(text);
        for (fare, keywords) in FARE_KEYWORDS {
            if keywords.iter().any(|k| haystack.contains(k)) {
                return *fare;
            }
        }
        FareType::Standard
    }

    /// Fixed weight per label plus the multi-promotion bonus.
    pub fn score(&self, labels: &[String]) -> i64 {
        if labels.is_empty() {
            return 0;
        }
        let base: i64 = labels.iter().map(|l| self.catalog.weight_of(l)).sum();
        base + self.catalog.multi_promo_bonus * labels.len() as i64
    }

    /// Fill `promotions`, `promotion_score`, and `fare_type` in place.
    pub fn annotate(&self, offer: &mut CorrelatedOffer) {
        let text = offer.full_text();
        offer.promotions = self.classify(&text);
        offer.promotion_score = self.score(&offer.promotions);
        offer.fare_type = self.fare_type(&text);
    }

    /// Partition into promoted (score desc, label count desc, price asc)
    /// and plain (price asc), capping each list.
    pub fn rank(
        &self,
        offers: Vec<CorrelatedOffer>,
        max_promociones: usize,
        max_opciones_baratas: usize,
    ) -> RankedOffers {
        let (mut promoted, mut plain): (Vec<_>, Vec<_>) =
            offers.into_iter().partition(|o| !o.promotions.is_empty());
        promoted.sort_by(|a, b| {
            b.promotion_score
                .cmp(&a.promotion_score)
                .then(b.promotions.len().cmp(&a.promotions.len()))
                .then(a.total_price.total_cmp(&b.total_price))
        });
        promoted.truncate(max_promociones);
        plain.sort_by(|a, b| a.total_price.total_cmp(&b.total_price));
        plain.truncate(max_opciones_baratas);
        RankedOffers { promoted, plain }
    }
}

/// Drop non-refundable offers for far-future trips. Active when
/// `grace_days` is set and the trip starts beyond it; an offer counts as
/// non-refundable when the fare keywords say so or the scraped flag does.
pub fn filter_non_refundable(
    offers: Vec<CorrelatedOffer>,
    trip_start: NaiveDate,
    today: NaiveDate,
    grace_days: Option<u32>,
) -> Vec<CorrelatedOffer> {
    let Some(grace) = grace_days else {
        return offers;
    };
    let days_out = (trip_start - today).num_days();
    if days_out <= i64::from(grace) {
        return offers;
    }
    let before = offers.len();
    let kept: Vec<_> = offers
        .into_iter()
        .filter(|o| o.fare_type != FareType::NonRefundable && o.refundable)
        .collect();
    if kept.len() < before {
        tracing::debug!(
            dropped = before - kept.len(),
            days_out,
            "non-refundable offers excluded for a far-future trip"
        );
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> PromotionClassifier {
        PromotionClassifier::new(PromotionCatalog::default())
    }

    #[test]
    fn catalog_matching_ignores_case_and_accents() {
        let labels = classifier().classify("Incluye GARANTÍA NATURCHARTER y Menores Gratis");
        assert_eq!(
            labels,
            vec!["Garantía NaturCharter".to_string(), "Menores gratis".to_string()]
        );
    }

    #[test]
    fn synonym_phrases_map_to_one_canonical_label() {
        let labels = classifier().classify("niños gratis en agosto, menores gratis");
        assert_eq!(labels, vec!["Menores gratis".to_string()]);
    }

    #[test]
    fn heuristics_add_labels_beyond_the_catalog() {
        let labels = classifier().classify("habitación con free wifi y spa gratis");
        assert!(labels.contains(&"WiFi gratis".to_string()));
        assert!(labels.contains(&"Spa gratis".to_string()));
    }

    #[test]
    fn percent_discount_is_detected() {
        let labels = classifier().classify("ahora con un 20% de descuento");
        assert_eq!(labels, vec!["Descuento 20%".to_string()]);
    }

    #[test]
    fn fare_type_first_match_wins() {
        let c = classifier();
        // Non-refundable dominates even when other groups also match.
        assert_eq!(
            c.fare_type("tarifa no reembolsable con confirmación inmediata"),
            FareType::NonRefundable
        );
        assert_eq!(c.fare_type("reserva bajo petición"), FareType::OnRequest);
        assert_eq!(
            c.fare_type("confirmación inmediata garantizada"),
            FareType::ImmediateConfirmation
        );
        assert_eq!(c.fare_type("precio especial de agosto"), FareType::SpecialRate);
        assert_eq!(c.fare_type("habitación doble con desayuno"), FareType::Standard);
    }

    #[test]
    fn score_uses_table_defaults_and_bonus() {
        let c = classifier();
        let labels = vec!["Menores gratis".to_string(), "WiFi gratis".to_string()];
        // 100 + 10 + bonus 5×2
        assert_eq!(c.score(&labels), 120);
        // Unlisted labels fall back to the default weight plus the bonus.
        assert_eq!(c.score(&["Descuento 20%".to_string()]), 20);
        assert_eq!(c.score(&[]), 0);
    }

    fn offer_with(promos: &[&str], score: i64, price: f64) -> CorrelatedOffer {
        CorrelatedOffer {
            id: format!("of-{price}"),
            title: "Hotel Sol".into(),
            room_description: "Doble".into(),
            promo_label: None,
            refundable: true,
            price_per_adult: price / 2.0,
            price_per_minor_average: 0.0,
            total_price: price,
            fare_type: FareType::Standard,
            correlation_confidence: 1.0,
            promotions: promos.iter().map(|s| s.to_string()).collect(),
            promotion_score: score,
        }
    }

    #[test]
    fn rank_partitions_sorts_and_caps() {
        let offers = vec![
            offer_with(&[], 0, 3000.0),
            offer_with(&["Menores gratis"], 105, 9000.0),
            offer_with(&[], 0, 2000.0),
            offer_with(&["WiFi gratis"], 15, 5000.0),
            offer_with(&[], 0, 4000.0),
        ];
        let ranked = classifier().rank(offers, 5, 2);
        assert_eq!(ranked.promoted.len(), 2);
        assert_eq!(ranked.promoted[0].promotion_score, 105);
        assert_eq!(ranked.plain.len(), 2);
        assert_eq!(ranked.plain[0].total_price, 2000.0);
        assert_eq!(ranked.plain[1].total_price, 3000.0);
    }

    #[test]
    fn rank_breaks_score_ties_by_label_count_then_price() {
        let mut two_labels = offer_with(&["Spa gratis", "WiFi gratis"], 50, 6000.0);
        two_labels.id = "two".into();
        let mut one_label = offer_with(&["Mejora de régimen"], 50, 5000.0);
        one_label.id = "one".into();
        let ranked = classifier().rank(vec![one_label, two_labels], 5, 5);
        assert_eq!(ranked.promoted[0].id, "two");
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn far_future_non_refundable_offers_are_filtered() {
        let mut non_ref = offer_with(&[], 0, 3000.0);
        non_ref.fare_type = FareType::NonRefundable;
        non_ref.refundable = false;
        let keep = offer_with(&[], 0, 4000.0);

        // Trip 20 days out, grace 14: non-refundable goes away.
        let kept = filter_non_refundable(
            vec![non_ref.clone(), keep.clone()],
            date(2026, 8, 21),
            date(2026, 8, 1),
            Some(14),
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].total_price, 4000.0);

        // Inside the grace window nothing is dropped.
        let kept = filter_non_refundable(
            vec![non_ref.clone(), keep.clone()],
            date(2026, 8, 10),
            date(2026, 8, 1),
            Some(14),
        );
        assert_eq!(kept.len(), 2);

        // Filter disabled.
        let kept = filter_non_refundable(
            vec![non_ref, keep],
            date(2026, 8, 21),
            date(2026, 8, 1),
            None,
        );
        assert_eq!(kept.len(), 2);
    }
}
