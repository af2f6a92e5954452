//! Recommendation panel that follows the build wizard.
//!
//! [`RecommendationPanel::attach`] renders once for the builder's current
//! state, then subscribes to the builder and re-renders after every build
//! event. Each render is kept as a [`PanelUpdate`] so the caller can show
//! them and count impressions.

use std::cell::RefCell;
use std::rc::Rc;

use dreamcar_core::builder::{BuildEvent, CarBuilder, SubscriptionId};
use dreamcar_core::context::{builder_context, context_from_build};
use dreamcar_core::recommend::{EnhancedProduct, RecommendationEngine};

/// One render of the panel.
#[derive(Debug, Clone)]
pub struct PanelUpdate {
    /// `None` for the render done on attach.
    pub event: Option<BuildEvent>,
    pub step: u8,
    pub results: Vec<EnhancedProduct>,
}

#[derive(Debug)]
pub struct RecommendationPanel {
    updates: Rc<RefCell<Vec<PanelUpdate>>>,
    subscription: SubscriptionId,
}

impl RecommendationPanel {
    pub fn attach(builder: &mut CarBuilder, engine: Rc<RecommendationEngine>) -> Self {
        let initial = PanelUpdate {
            event: None,
            step: builder.current_step(),
            results: engine.recommendations(&builder_context(builder)),
        };
        let updates = Rc::new(RefCell::new(vec![initial]));

        let sink = Rc::clone(&updates);
        let mut step = builder.current_step();
        let subscription = builder.subscribe(move |event, data| {
            if let BuildEvent::StepChanged { to, .. } = event {
                step = *to;
            }
            let results = engine.recommendations(&context_from_build(data, step));
            tracing::debug!(?event, step, count = results.len(), "recommendation panel updated");
            sink.borrow_mut().push(PanelUpdate {
                event: Some(event.clone()),
                step,
                results,
            });
        });

        Self {
            updates,
            subscription,
        }
    }

    /// Remove and return the renders recorded so far.
    pub fn take_updates(&self) -> Vec<PanelUpdate> {
        std::mem::take(&mut *self.updates.borrow_mut())
    }

    pub fn latest(&self) -> Option<Vec<EnhancedProduct>> {
        self.updates.borrow().last().map(|u| u.results.clone())
    }

    pub fn detach(self, builder: &mut CarBuilder) -> bool {
        builder.unsubscribe(self.subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dreamcar_core::builder::BuildTypeSelection;

    fn ids(results: &[EnhancedProduct]) -> Vec<&str> {
        results.iter().map(|r| r.product.id.as_str()).collect()
    }

    #[test]
    fn test_initial_render_on_attach() {
        let mut builder = CarBuilder::new();
        let panel = RecommendationPanel::attach(&mut builder, Rc::default());
        let updates = panel.take_updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].event, None);
        assert_eq!(updates[0].step, 1);
        assert_eq!(ids(&updates[0].results), vec!["B08X1BK3YZ"]);
    }

    #[test]
    fn test_rerenders_on_build_events() {
        let mut builder = CarBuilder::new();
        let panel = RecommendationPanel::attach(&mut builder, Rc::default());
        panel.take_updates();

        builder.set_vehicle_manually("Ford Mustang GT");
        builder.go_to_step(2).unwrap();
        builder.select_build_type(BuildTypeSelection {
            build_type: "street".to_string(),
            description: String::new(),
            categories: vec![],
        });

        let updates = panel.take_updates();
        let events: Vec<_> = updates.iter().map(|u| u.event.clone()).collect();
        assert_eq!(
            events,
            vec![
                Some(BuildEvent::VehicleSelected),
                Some(BuildEvent::StepChanged { from: 1, to: 2 }),
                Some(BuildEvent::BuildTypeSelected),
            ]
        );
        assert_eq!(updates[0].step, 1);
        assert_eq!(updates[1].step, 2);
        // step 2 maps to the "general" category, which no catalog section uses
        assert!(updates[2].results.is_empty());
    }

    #[test]
    fn test_step_tracks_backwards_moves() {
        let mut builder = CarBuilder::new();
        let panel = RecommendationPanel::attach(&mut builder, Rc::default());
        builder.go_to_step(2).unwrap();
        builder.go_to_step(1).unwrap();
        let last = panel.take_updates().pop().unwrap();
        assert_eq!(last.step, 1);
        assert_eq!(ids(&last.results), vec!["B08X1BK3YZ"]);
    }

    #[test]
    fn test_detach_stops_updates() {
        let mut builder = CarBuilder::new();
        let panel = RecommendationPanel::attach(&mut builder, Rc::default());
        let updates = Rc::clone(&panel.updates);
        assert!(panel.detach(&mut builder));
        builder.set_vehicle_manually("Civic");
        assert_eq!(updates.borrow().len(), 1);
    }
}
