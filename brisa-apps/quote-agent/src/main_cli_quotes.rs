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
//! ## Plan a window without searching
//!
//! ```bash
//! brisa-quotes -L "Riviera Maya" -i 2026-09-15 -o 2026-09-18 -t ground --dry-run
//! ```
//!
//! ## Replay a captured search
//!
//! ```bash
//! brisa-quotes -L "Riviera Maya" -i 2026-09-17 -o 2026-09-20 -a 2 -c 8 \
//!     --offers-adults fixtures/adults.json --offers-minors fixtures/minors.json
//! ```
//!
//! ## Budget cap and preferred hotel
//!
//! ```bash
//! brisa-quotes -L "Riviera Maya" -i 2026-09-17 -o 2026-09-20 -P media_pension \
//!     --budget 4500 --hotel "Hotel Sol" --offers-adults fixtures/adults.json
//! ```
//!
//! # Output
//!
//! The tool prints a summary of the search parameters followed by one block
//! per offer: total and per-person prices, fare terms, and detected
//! promotions.

use anyhow::{Context, Result};
use clap::Parser;

use brisa_quote_agent::{
    PassengerConfig, Plan, QuoteConfig, QuoteService, ReplayDriver, SubmitSearch, TransportMode,
    offer_block, outcome_summary, plan_window,
};

#[derive(Parser, Debug)]
#[command(name = "brisa-quotes")]
#[command(version = "0.1.0")]
#[command(about = "Search charter package offers with retries and per-person pricing")]
struct Args {
    #[arg(short = 'L', long)]
    destination: String,
    #[arg(short = 'i', long)]
    checkin: String,
    #[arg(short = 'o', long)]
    checkout: String,
    #[arg(short = 'a', long, default_value = "2")]
    adults: u32,
    #[arg(short = 'c', long, help = "Minor ages (comma-separated, e.g., 5,10)")]
    minors: Option<String>,
    #[arg(short = 't', long, default_value = "ground", help = "ground, air, or none")]
    transport: String,
    #[arg(short = 'P', long, default_value = "solo_alojamiento", help = "Board plan")]
    plan: String,
    #[arg(long, help = "Maximum price per adult")]
    budget: Option<f64>,
    #[arg(long, help = "Preferred hotel name")]
    hotel: Option<String>,
    #[arg(long, help = "JSON file with captured adults-only offers")]
    offers_adults: Option<std::path::PathBuf>,
    #[arg(long, help = "JSON file with captured adults+minors offers")]
    offers_minors: Option<std::path::PathBuf>,
    #[arg(long, help = "JSON config file (maxDateWindows, maxPromociones, ...)")]
    config: Option<std::path::PathBuf>,
    #[arg(long, help = "Plan the date window without searching")]
    dry_run: bool,
}

fn parse_date(s: &str) -> Result<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Invalid date: {}", s))
}

fn parse_minor_ages(s: &str) -> Result<Vec<i64>> {
    if s.is_empty() {
        return Ok(Vec::new());
    }
    s.split(',')
        .map(|age| {
            age.trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid minor age: {}", age.trim()))
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let checkin = parse_date(&args.checkin)?;
    let checkout = parse_date(&args.checkout)?;
    let transport = TransportMode::from_str_name(&args.transport)
        .ok_or_else(|| anyhow::anyhow!("Unknown transport mode: {}", args.transport))?;
    let plan = Plan::from_str_name(&args.plan)
        .ok_or_else(|| anyhow::anyhow!("Unknown plan: {}", args.plan))?;
    let minor_ages = args
        .minors
        .as_deref()
        .map(parse_minor_ages)
        .transpose()?
        .unwrap_or_default();

    let config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            QuoteConfig::from_json_str(&raw)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => QuoteConfig::default(),
    };

    println!("\n🚌 Búsqueda de paquetes");
    println!("=======================");
    println!("Destino: {}", args.destination);
    println!("Fechas: {} a {}", checkin, checkout);
    println!(
        "Ocupación: {} adultos, {} menores",
        args.adults,
        minor_ages.len()
    );
    println!("Transporte: {} | Plan: {}", transport.as_str_name(), plan.as_str_name());
    println!("=======================");

    if args.dry_run {
        let today = chrono::Local::now().date_naive();
        let window = plan_window(checkin, checkout, transport, today)?;
        println!("\n📅 Ventana planificada: {} a {} ({} noches)", window.start, window.end, window.nights);
        if let Some(note) = &window.adjustment_note {
            println!("⚠️ {}", note);
        }
        return Ok(());
    }

    let adults_path = args.offers_adults.as_deref().ok_or_else(|| {
        anyhow::anyhow!(
            "No live page driver is wired into this binary; \
             pass --offers-adults (and optionally --offers-minors) to replay captured offers"
        )
    })?;
    let driver = ReplayDriver::from_fixture_files(adults_path, args.offers_minors.as_deref())?;

    let service = QuoteService::spawn(driver, config);
    let minor_count = minor_ages.len() as u32;
    let passengers = PassengerConfig::new(args.adults, minor_count, &minor_ages)?;

    let outcome = service
        .submit_search(SubmitSearch {
            destination: args.destination,
            start: checkin,
            end: checkout,
            adults: args.adults,
            minor_count,
            minor_ages,
            transport,
            plan,
            budget_per_adult: args.budget,
            desired_hotel: args.hotel,
        })
        .await?;

    println!("\n{}\n", outcome_summary(&outcome));
    for offer in &outcome.offers {
        println!("{}\n", offer_block(offer, &passengers));
    }
    if !outcome.success {
        std::process::exit(1);
    }
    Ok(())
}
