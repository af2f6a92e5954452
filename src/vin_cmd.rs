//! `dreamcar vin check|decode`.

use anyhow::{bail, Result};
use dreamcar_core::vin::{validate_vin, VehicleRecord};

use crate::config::Config;
use crate::decode::{LookupError, VinLookup};

/// Input as typed into a VIN field: surrounding whitespace dropped, upper-cased.
pub fn normalize_vin(input: &str) -> String {
    input.trim().to_uppercase()
}

pub fn run_check(input: &str) -> Result<()> {
    let vin = normalize_vin(input);
    match validate_vin(&vin) {
        Ok(()) => {
            println!("✓ Valid VIN: {}", vin);
            Ok(())
        }
        Err(e) => bail!("Invalid VIN format. Please check and try again. ({})", e),
    }
}

/// Validate locally, then look the vehicle up.
pub async fn lookup_vehicle(config: &Config, input: &str) -> Result<(String, VehicleRecord)> {
    let vin = normalize_vin(input);
    if let Err(e) = validate_vin(&vin) {
        bail!("Invalid VIN format. Please check and try again. ({})", e);
    }

    let lookup = VinLookup::new(&config.vin)?;
    match lookup.decode(&vin).await {
        Ok(record) => Ok((vin, record)),
        Err(e @ LookupError::Network(_)) => {
            bail!("Failed to decode VIN: {}. Please try again.", e)
        }
        Err(e) => bail!("Failed to decode VIN: {}", e),
    }
}

pub async fn run_decode(config: &Config, input: &str, json: bool) -> Result<()> {
    let (vin, record) = lookup_vehicle(config, input).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("{}", record.display_name());
    println!("VIN: {}", vin);
    println!();
    for (label, value) in record.detail_rows() {
        println!("  {:<14} {}", format!("{}:", label), value);
    }
    Ok(())
}
