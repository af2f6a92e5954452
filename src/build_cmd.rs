//! `dreamcar build`: drive the build wizard from the command line.
//!
//! Choosing a vehicle moves the wizard to step 2 and choosing a build type
//! moves it to step 3, as the wizard's Next buttons would. `--step` then
//! walks forward one step at a time or jumps straight back. The attached
//! recommendation panel re-renders after every change and each non-empty
//! render counts as impressions.

use std::rc::Rc;

use anyhow::{bail, Result};
use dreamcar_core::builder::{BuildEvent, BuildTypeSelection, CarBuilder, StepError};
use dreamcar_core::recommend::BuildType;

use crate::catalog_file::load_engine;
use crate::config::Config;
use crate::panel::{PanelUpdate, RecommendationPanel};
use crate::recommend_cmd::print_recommendations;
use crate::stats::open_tracker;
use crate::vin_cmd::lookup_vehicle;

#[derive(Debug, Default, Clone)]
pub struct BuildArgs {
    pub vin: Option<String>,
    pub vehicle: Option<String>,
    pub build_type: Option<String>,
    pub step: Option<u8>,
    pub export: bool,
}

/// The build type card for a label, with the part categories it advertises.
pub fn build_type_card(label: &str) -> BuildTypeSelection {
    let (description, categories): (&str, &[&str]) = match BuildType::parse(label) {
        BuildType::Track => ("Lap times and consistency", &["Suspension", "Brakes", "Aero"]),
        BuildType::Drift => ("Angle, grip balance, and control", &["Suspension", "Tires", "Differential"]),
        BuildType::Drag => ("Straight-line acceleration", &["Engine", "Transmission", "Tires"]),
        BuildType::Street => ("Daily-drivable performance", &["Intake", "Exhaust", "Wheels"]),
        BuildType::Show => ("Looks that stop traffic", &["Exterior", "Interior", "Lighting"]),
        BuildType::Autocross => ("Tight courses and quick transitions", &["Suspension", "Tires", "Brakes"]),
        BuildType::Unrecognized(_) => ("", &[]),
    };

    BuildTypeSelection {
        build_type: label.to_string(),
        description: description.to_string(),
        categories: categories.iter().map(|c| c.to_string()).collect(),
    }
}

/// Move to `target`, one step at a time when moving forward.
pub fn walk_to_step(builder: &mut CarBuilder, target: u8) -> Result<(), StepError> {
    if target <= builder.current_step() || target > dreamcar_core::builder::MAX_STEP {
        if target != builder.current_step() {
            builder.go_to_step(target)?;
        }
        return Ok(());
    }
    while builder.current_step() < target {
        builder.go_to_step(builder.current_step() + 1)?;
    }
    Ok(())
}

pub async fn run_build(config: &Config, args: &BuildArgs) -> Result<()> {
    if args.vin.is_some() && args.vehicle.is_some() {
        bail!("Use either --vin or --vehicle, not both");
    }

    let engine = Rc::new(load_engine(config)?);
    let mut builder = CarBuilder::new();
    let panel = RecommendationPanel::attach(&mut builder, Rc::clone(&engine));

    if let Some(vin) = &args.vin {
        let (vin, record) = lookup_vehicle(config, vin).await?;
        builder.set_vehicle_from_vin(record.display_name(), vin, record);
        builder.go_to_step(2)?;
    } else if let Some(description) = &args.vehicle {
        let description = description.trim();
        if description.is_empty() {
            bail!("--vehicle must not be empty");
        }
        builder.set_vehicle_manually(description);
        builder.go_to_step(2)?;
    }

    if let Some(label) = &args.build_type {
        if builder.current_step() < 2 {
            builder.go_to_step(2)?;
        }
        builder.select_build_type(build_type_card(label));
        builder.go_to_step(3)?;
    }

    if let Some(step) = args.step {
        walk_to_step(&mut builder, step)?;
    }

    let updates = panel.take_updates();
    let mut tracker = open_tracker(config);
    for update in updates.iter().filter(|u| !u.results.is_empty()) {
        tracker.record_impression(update.results.len() as u64);
    }

    if args.export {
        println!("{}", serde_json::to_string_pretty(&builder.summary())?);
        return Ok(());
    }

    let data = builder.data();
    println!("Build");
    println!("=====");
    println!(
        "  Vehicle:    {}",
        data.vehicle
            .as_ref()
            .map(|v| v.display_string())
            .unwrap_or("(none)")
    );
    println!(
        "  Build type: {}",
        data.build_type
            .as_ref()
            .map(|b| b.build_type.as_str())
            .unwrap_or("(none)")
    );
    println!("  Step:       {} of {}", builder.current_step(), dreamcar_core::builder::MAX_STEP);
    println!();
    println!("  Panel updates:");
    for update in &updates {
        println!(
            "    [step {}] {:<24} {} products",
            update.step,
            describe(update),
            update.results.len()
        );
    }
    println!();

    print_recommendations(updates.last().map(|u| u.results.as_slice()).unwrap_or(&[]));
    Ok(())
}

fn describe(update: &PanelUpdate) -> String {
    match &update.event {
        None => "initial".to_string(),
        Some(BuildEvent::StepChanged { from, to }) => format!("step {} -> {}", from, to),
        Some(BuildEvent::VehicleSelected) => "vehicle selected".to_string(),
        Some(BuildEvent::BuildTypeSelected) => "build type selected".to_string(),
        Some(BuildEvent::PartsChanged) => "parts changed".to_string(),
    }
}
