//! Building recommendation contexts from wizard state and page presets.

use crate::builder::{BuildData, CarBuilder};
use crate::recommend::{RecommendationContext, VehicleContext};

/// Catalog category shown alongside each wizard step.
pub fn step_category(step: u8) -> &'static str {
    match step {
        1 => "tools",
        2 => "general",
        3 => "parts",
        4 => "accessories",
        _ => "general",
    }
}

/// Context for the recommendation panel next to the build wizard.
pub fn builder_context(builder: &CarBuilder) -> RecommendationContext {
    context_from_build(builder.data(), builder.current_step())
}

/// Context derived from a build snapshot at a given step.
///
/// Keywords are the selected build type's categories followed by the
/// decoded vehicle's make, model, and body style.
pub fn context_from_build(data: &BuildData, step: u8) -> RecommendationContext {
    let mut ctx = RecommendationContext::new().with_category(step_category(step));

    if let Some(bt) = &data.build_type {
        ctx = ctx.with_build_type(&bt.build_type);
    }
    if let Some(vehicle) = &data.vehicle {
        ctx.vehicle = Some(VehicleContext::Selected(vehicle.clone()));
    }

    ctx.keywords = build_keywords(data);
    ctx
}

fn build_keywords(data: &BuildData) -> Vec<String> {
    let mut keywords: Vec<String> = data
        .build_type
        .iter()
        .flat_map(|bt| bt.categories.iter().cloned())
        .collect();

    if let Some(record) = data.vehicle.as_ref().and_then(|v| v.record()) {
        keywords.extend(
            [&record.make, &record.model, &record.body_style]
                .into_iter()
                .flatten()
                .cloned(),
        );
    }

    keywords
}

/// Site pages that carry a recommendation panel outside the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageContext {
    Gallery,
    Homepage,
    General,
}

impl PageContext {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "gallery" => Some(Self::Gallery),
            "homepage" | "home" => Some(Self::Homepage),
            "general" => Some(Self::General),
            _ => None,
        }
    }

    /// Fixed query used for this page.
    pub fn context(self) -> RecommendationContext {
        match self {
            Self::Gallery => RecommendationContext::new()
                .with_category("exterior")
                .with_keywords(["supercar", "performance", "luxury", "sports car"])
                .with_build_type("show"),
            Self::Homepage => RecommendationContext::new()
                .with_category("general")
                .with_keywords(["car", "automotive", "performance", "modification"])
                .with_build_type("street"),
            Self::General => RecommendationContext::new()
                .with_keywords(["car", "automotive", "performance"])
                .with_category("tools"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BuildTypeSelection;
    use crate::recommend::{BuildType, RecommendationEngine};
    use crate::vin::VehicleRecord;

    #[test]
    fn test_step_categories() {
        assert_eq!(step_category(1), "tools");
        assert_eq!(step_category(2), "general");
        assert_eq!(step_category(3), "parts");
        assert_eq!(step_category(4), "accessories");
    }

    #[test]
    fn test_fresh_builder_context() {
        let builder = CarBuilder::new();
        let ctx = builder_context(&builder);
        assert_eq!(ctx.category.as_deref(), Some("tools"));
        assert_eq!(ctx.build_type, None);
        assert_eq!(ctx.vehicle, None);
        assert!(ctx.keywords.is_empty());

        let results = RecommendationEngine::default().recommendations(&ctx);
        let ids: Vec<&str> = results.iter().map(|r| r.product.id.as_str()).collect();
        assert_eq!(ids, vec!["B08X1BK3YZ"]);
    }

    #[test]
    fn test_keywords_from_build_type_and_vin_record() {
        let mut builder = CarBuilder::new();
        let record = VehicleRecord {
            make: Some("HONDA".into()),
            model: Some("Accord".into()),
            body_style: Some("Coupe".into()),
            ..Default::default()
        };
        builder.set_vehicle_from_vin("2003 HONDA Accord", "1HGCM82633A004352", record);
        builder.go_to_step(2).unwrap();
        builder.select_build_type(BuildTypeSelection {
            build_type: "Track".to_string(),
            description: "Lap times".to_string(),
            categories: vec!["Suspension".to_string(), "Brakes".to_string()],
        });

        let ctx = builder_context(&builder);
        assert_eq!(ctx.category.as_deref(), Some("general"));
        assert_eq!(ctx.build_type, Some(BuildType::Track));
        assert_eq!(
            ctx.keywords,
            vec!["Suspension", "Brakes", "HONDA", "Accord", "Coupe"]
        );
    }

    #[test]
    fn test_manual_vehicle_adds_no_keywords() {
        let mut builder = CarBuilder::new();
        builder.set_vehicle_manually("Subaru WRX");
        let ctx = builder_context(&builder);
        assert!(ctx.keywords.is_empty());
        assert!(matches!(ctx.vehicle, Some(VehicleContext::Selected(_))));
    }

    #[test]
    fn test_page_presets() {
        assert_eq!(PageContext::parse("Gallery"), Some(PageContext::Gallery));
        assert_eq!(PageContext::parse("nope"), None);

        let general = PageContext::General.context();
        assert_eq!(general.category.as_deref(), Some("tools"));
        let results = RecommendationEngine::default().recommendations(&general);
        // the only Tools product carries none of the preset keywords
        assert!(results.is_empty());

        let gallery = PageContext::Gallery.context();
        assert_eq!(gallery.build_type, Some(BuildType::Show));
        assert_eq!(gallery.keywords.len(), 4);
    }
}
