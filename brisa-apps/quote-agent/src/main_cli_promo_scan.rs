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
//!
//! # Examples
//!
//! ## Print the next eight Thursday→Sunday windows
//!
//! ```bash
//! brisa-promo-scan --weeks 8
//! ```
//!
//! ## Classify captured offers and list the top promotions
//!
//! ```bash
//! brisa-promo-scan --weeks 4 --offers fixtures/adults.json
//! ```

use anyhow::{Context, Result};
use clap::Parser;

use brisa_quote_agent::{
    CorrelationConfig, OfferCorrelationEngine, PassengerConfig, PromotionCatalog,
    PromotionClassifier, RawOffer, weekly_scan_windows,
};

#[derive(Parser, Debug)]
#[command(name = "brisa-promo-scan")]
#[command(version = "0.1.0")]
#[command(about = "Weekly Thursday→Sunday windows for the promotion scan")]
struct Args {
    #[arg(short = 'w', long, default_value = "8")]
    weeks: u32,
    #[arg(long, help = "Scan start date (defaults to today)")]
    from: Option<String>,
    #[arg(long, help = "JSON file with captured offers to classify")]
    offers: Option<std::path::PathBuf>,
    #[arg(short = 'n', long, default_value = "5")]
    limit: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let today = chrono::Local::now().date_naive();
    let from = match &args.from {
        Some(s) => chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| anyhow::anyhow!("Invalid date: {}", s))?,
        None => today,
    };

    let windows = weekly_scan_windows(from, args.weeks, today);
    println!("\n📅 Ventanas jueves→domingo ({} semanas)", args.weeks);
    println!("=======================");
    for (i, window) in windows.iter().enumerate() {
        println!("{}. {} a {} ({} noches)", i + 1, window.start, window.end, window.nights);
    }
    if windows.is_empty() {
        println!("Ninguna ventana futura en el rango pedido.");
    }

    let Some(offers_path) = &args.offers else {
        return Ok(());
    };

    let raw = std::fs::read_to_string(offers_path)
        .with_context(|| format!("reading offers {}", offers_path.display()))?;
    let offers: Vec<RawOffer> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing offers {}", offers_path.display()))?;

    // Price the rows as a plain two-adult search, then classify.
    let passengers = PassengerConfig::new(2, 0, &[])?;
    let engine = OfferCorrelationEngine::new(CorrelationConfig::default());
    let classifier = PromotionClassifier::new(PromotionCatalog::default());

    let mut correlated = engine.correlate(&offers, &[], &passengers);
    for offer in &mut correlated {
        classifier.annotate(offer);
    }
    let ranked = classifier.rank(correlated, args.limit, args.limit);

    println!("\n🎁 Con promociones");
    println!("=======================");
    for offer in &ranked.promoted {
        println!(
            "{} — {} | {:.0} € | {} (puntos: {})",
            offer.title,
            offer.room_description,
            offer.total_price,
            offer.promotions.join(", "),
            offer.promotion_score
        );
    }
    if ranked.promoted.is_empty() {
        println!("Ninguna oferta con promociones.");
    }

    println!("\n💶 Más baratas sin promoción");
    println!("=======================");
    for offer in &ranked.plain {
        println!(
            "{} — {} | {:.0} €",
            offer.title, offer.room_description, offer.total_price
        );
    }
    Ok(())
}
