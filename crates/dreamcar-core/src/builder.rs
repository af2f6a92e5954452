//! Step-based build wizard state.
//!
//! [`CarBuilder`] owns the user's in-progress build: which wizard step is
//! active, the chosen vehicle and build type, and the parts list. Every
//! mutation notifies subscribed listeners with a [`BuildEvent`] and the
//! updated [`BuildData`], so recommendation panels can refresh without the
//! builder knowing about them.
//!
//! # Steps
//!
//! | Step | Purpose |
//! |------|---------|
//! | 1 | Pick a vehicle (VIN or manual entry) |
//! | 2 | Pick a build type |
//! | 3 | Choose parts |
//! | 4 | Review and export |
//!
//! Moving backwards is always allowed; moving forward is limited to the
//! next step.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::recommend::VehicleSelection;
use crate::vin::VehicleRecord;

pub const FIRST_STEP: u8 = 1;
pub const MAX_STEP: u8 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    #[error("step {0} is outside 1..=4")]
    OutOfRange(u8),
    #[error("cannot skip from step {current} to step {target}")]
    Skip { current: u8, target: u8 },
}

/// A build type card the user selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTypeSelection {
    #[serde(rename = "type")]
    pub build_type: String,
    #[serde(default)]
    pub description: String,
    /// Part categories advertised on the card, used as recommendation keywords.
    #[serde(default)]
    pub categories: Vec<String>,
}

/// A part added to the build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPart {
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildData {
    pub vehicle: Option<VehicleSelection>,
    pub build_type: Option<BuildTypeSelection>,
    pub parts: Vec<BuildPart>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_cost: Decimal,
}

/// Exportable snapshot of a build.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSummary {
    #[serde(flatten)]
    pub build: BuildData,
    pub step: u8,
    pub generated_at: DateTime<Utc>,
}

/// What changed in the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    StepChanged { from: u8, to: u8 },
    VehicleSelected,
    BuildTypeSelected,
    PartsChanged,
}

/// Handle returned by [`CarBuilder::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&BuildEvent, &BuildData)>;

pub struct CarBuilder {
    current_step: u8,
    data: BuildData,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl CarBuilder {
    pub fn new() -> Self {
        Self {
            current_step: FIRST_STEP,
            data: BuildData::default(),
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn current_step(&self) -> u8 {
        self.current_step
    }

    pub fn data(&self) -> &BuildData {
        &self.data
    }

    /// Register a listener called after every mutation.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&BuildEvent, &BuildData) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn go_to_step(&mut self, step: u8) -> Result<(), StepError> {
        if !(FIRST_STEP..=MAX_STEP).contains(&step) {
            return Err(StepError::OutOfRange(step));
        }
        if step > self.current_step + 1 {
            return Err(StepError::Skip {
                current: self.current_step,
                target: step,
            });
        }

        let from = self.current_step;
        self.current_step = step;
        tracing::debug!(from, to = step, "build step changed");
        self.emit(BuildEvent::StepChanged { from, to: step });
        Ok(())
    }

    pub fn set_vehicle_from_vin(
        &mut self,
        display_name: impl Into<String>,
        vin: impl Into<String>,
        record: VehicleRecord,
    ) {
        let selection = VehicleSelection::Vin {
            display_name: display_name.into(),
            vin: vin.into(),
            record,
        };
        tracing::info!(vehicle = selection.display_string(), "vehicle set from VIN");
        self.data.vehicle = Some(selection);
        self.emit(BuildEvent::VehicleSelected);
    }

    pub fn set_vehicle_manually(&mut self, description: impl Into<String>) {
        let selection = VehicleSelection::Manual {
            description: description.into(),
        };
        tracing::info!(vehicle = selection.display_string(), "vehicle set manually");
        self.data.vehicle = Some(selection);
        self.emit(BuildEvent::VehicleSelected);
    }

    pub fn select_build_type(&mut self, selection: BuildTypeSelection) {
        tracing::info!(build_type = %selection.build_type, "build type selected");
        self.data.build_type = Some(selection);
        self.emit(BuildEvent::BuildTypeSelected);
    }

    pub fn add_part(&mut self, part: BuildPart) {
        self.data.parts.push(part);
        self.recompute_cost();
        self.emit(BuildEvent::PartsChanged);
    }

    /// Remove every part with `id`. Returns `false` if none matched.
    pub fn remove_part(&mut self, id: &str) -> bool {
        let before = self.data.parts.len();
        self.data.parts.retain(|p| p.id != id);
        if self.data.parts.len() == before {
            return false;
        }
        self.recompute_cost();
        self.emit(BuildEvent::PartsChanged);
        true
    }

    pub fn summary(&self) -> BuildSummary {
        BuildSummary {
            build: self.data.clone(),
            step: self.current_step,
            generated_at: Utc::now(),
        }
    }

    fn recompute_cost(&mut self) {
        self.data.total_cost = self.data.parts.iter().map(|p| p.price).sum();
    }

    fn emit(&mut self, event: BuildEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event, &self.data);
        }
    }
}

impl Default for CarBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CarBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarBuilder")
            .field("current_step", &self.current_step)
            .field("data", &self.data)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn part(id: &str, cents: i64) -> BuildPart {
        BuildPart {
            id: id.to_string(),
            name: format!("part {}", id),
            price: Decimal::new(cents, 2),
        }
    }

    #[test]
    fn test_starts_at_first_step() {
        let builder = CarBuilder::new();
        assert_eq!(builder.current_step(), 1);
        assert_eq!(builder.data(), &BuildData::default());
    }

    #[test]
    fn test_cannot_skip_forward() {
        let mut builder = CarBuilder::new();
        assert_eq!(
            builder.go_to_step(3),
            Err(StepError::Skip {
                current: 1,
                target: 3
            })
        );
        assert_eq!(builder.current_step(), 1);
        builder.go_to_step(2).unwrap();
        builder.go_to_step(3).unwrap();
        builder.go_to_step(1).unwrap();
        assert_eq!(builder.current_step(), 1);
    }

    #[test]
    fn test_step_out_of_range() {
        let mut builder = CarBuilder::new();
        assert_eq!(builder.go_to_step(0), Err(StepError::OutOfRange(0)));
        assert_eq!(builder.go_to_step(5), Err(StepError::OutOfRange(5)));
    }

    #[test]
    fn test_listeners_receive_events() {
        let mut builder = CarBuilder::new();
        let seen: Rc<RefCell<Vec<BuildEvent>>> = Rc::default();
        let sink = Rc::clone(&seen);
        builder.subscribe(move |event, _| sink.borrow_mut().push(event.clone()));

        builder.set_vehicle_manually("Ford Mustang");
        builder.go_to_step(2).unwrap();
        builder.select_build_type(BuildTypeSelection {
            build_type: "track".to_string(),
            description: String::new(),
            categories: vec![],
        });
        builder.add_part(part("a", 100));

        assert_eq!(
            *seen.borrow(),
            vec![
                BuildEvent::VehicleSelected,
                BuildEvent::StepChanged { from: 1, to: 2 },
                BuildEvent::BuildTypeSelected,
                BuildEvent::PartsChanged,
            ]
        );
    }

    #[test]
    fn test_listener_sees_updated_state() {
        let mut builder = CarBuilder::new();
        let vehicle: Rc<RefCell<Option<String>>> = Rc::default();
        let sink = Rc::clone(&vehicle);
        builder.subscribe(move |_, data| {
            *sink.borrow_mut() = data.vehicle.as_ref().map(|v| v.display_string().to_string());
        });
        builder.set_vehicle_from_vin("2003 HONDA Accord", "1HGCM82633A004352", VehicleRecord::default());
        assert_eq!(vehicle.borrow().as_deref(), Some("2003 HONDA Accord"));
    }

    #[test]
    fn test_unsubscribe() {
        let mut builder = CarBuilder::new();
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = builder.subscribe(move |_, _| *sink.borrow_mut() += 1);
        builder.set_vehicle_manually("Civic");
        assert!(builder.unsubscribe(id));
        assert!(!builder.unsubscribe(id));
        builder.set_vehicle_manually("Civic");
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_parts_total_cost() {
        let mut builder = CarBuilder::new();
        builder.add_part(part("a", 32999));
        builder.add_part(part("b", 8999));
        assert_eq!(builder.data().total_cost, Decimal::new(41998, 2));
        assert!(builder.remove_part("a"));
        assert_eq!(builder.data().total_cost, Decimal::new(8999, 2));
        assert!(!builder.remove_part("missing"));
    }

    #[test]
    fn test_summary_serializes() {
        let mut builder = CarBuilder::new();
        builder.set_vehicle_manually("Subaru WRX");
        builder.add_part(part("a", 12999));
        let json = serde_json::to_value(builder.summary()).unwrap();
        assert_eq!(json["vehicle"]["source"], "manual");
        assert_eq!(json["vehicle"]["description"], "Subaru WRX");
        assert_eq!(json["totalCost"], 129.99);
        assert_eq!(json["step"], 1);
        assert!(json["generatedAt"].is_string());
    }
}
