//! Affiliate performance overview and event recording.
//!
//! `dreamcar stats` prints the persisted counters with derived ratios.
//! `dreamcar click` and `dreamcar convert` record events by hand, the way a
//! storefront page would report them.

use anyhow::{bail, Context, Result};
use dreamcar_core::counters::PerformanceTracker;

use crate::config::Config;
use crate::file_store::JsonFileKvStore;

/// Tracker backed by the configured counters file.
pub fn open_tracker(config: &Config) -> PerformanceTracker<JsonFileKvStore> {
    PerformanceTracker::load(JsonFileKvStore::new(&config.counters.path))
}

pub fn run_stats(config: &Config, json: bool) -> Result<()> {
    let tracker = open_tracker(config);
    let report = tracker.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let c = report.counters;
    println!("Dream Car Builder: Affiliate Performance");
    println!("========================================");
    println!();
    println!("  Counters file:   {}", config.counters.path.display());
    println!();
    println!("  Impressions:     {}", c.impressions);
    println!("  Clicks:          {}", c.clicks);
    println!("  Conversions:     {}", c.conversions);
    println!("  Revenue:         {}", format_money(c.revenue));
    println!();
    println!("  CTR:             {}", format_percent(report.ctr));
    println!("  Conversion rate: {}", format_percent(report.conversion_rate));
    println!("  Revenue/click:   {}", format_money(report.revenue_per_click));
    println!();
    Ok(())
}

/// Record an affiliate click for a catalog product.
pub fn run_click(config: &Config, product_id: &str) -> Result<()> {
    let engine = crate::catalog_file::load_engine(config)?;
    let Some(product) = engine.catalog().get(product_id) else {
        bail!("Unknown product id: {}", product_id);
    };

    let mut tracker = open_tracker(config);
    tracker.record_click(&product.id);
    println!("{}", engine.affiliate().affiliate_url(&product.id));
    Ok(())
}

pub fn run_convert(config: &Config, product_id: &str, amount: &str) -> Result<()> {
    let amount: f64 = amount
        .trim()
        .trim_start_matches('$')
        .replace(',', "")
        .parse()
        .with_context(|| format!("Invalid amount: {}", amount))?;
    if !amount.is_finite() || amount < 0.0 {
        bail!("Invalid amount: {}", amount);
    }

    let mut tracker = open_tracker(config);
    tracker.record_conversion(product_id, amount);
    println!(
        "Recorded conversion for {} ({})",
        product_id,
        format_money(amount)
    );
    Ok(())
}

fn format_money(amount: f64) -> String {
    format!("${:.2}", amount)
}

fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}
