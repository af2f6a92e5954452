//! `dreamcar recommend` and `dreamcar catalog`.

use anyhow::{bail, Result};
use dreamcar_core::context::PageContext;
use dreamcar_core::recommend::{EnhancedProduct, RecommendationContext};

use crate::catalog_file::load_engine;
use crate::config::Config;
use crate::stats::open_tracker;

/// Query facets from the command line.
#[derive(Debug, Default, Clone)]
pub struct RecommendArgs {
    pub category: Option<String>,
    pub build_type: Option<String>,
    pub vehicle: Option<String>,
    pub keywords: Vec<String>,
    pub page: Option<String>,
    pub json: bool,
}

/// Build the query: the page preset (if any), with explicit flags on top.
pub fn build_context(args: &RecommendArgs) -> Result<RecommendationContext> {
    let mut ctx = match args.page.as_deref() {
        Some(name) => match PageContext::parse(name) {
            Some(page) => page.context(),
            None => bail!(
                "Unknown page '{}'. Expected one of: gallery, homepage, general",
                name
            ),
        },
        None => RecommendationContext::new(),
    };

    if let Some(category) = &args.category {
        ctx = ctx.with_category(category.as_str());
    }
    if let Some(build_type) = &args.build_type {
        ctx = ctx.with_build_type(build_type);
    }
    if let Some(vehicle) = &args.vehicle {
        ctx = ctx.with_vehicle_text(vehicle.as_str());
    }
    if !args.keywords.is_empty() {
        ctx = ctx.with_keywords(args.keywords.iter().cloned());
    }
    Ok(ctx)
}

pub fn run_recommend(config: &Config, args: &RecommendArgs) -> Result<()> {
    let engine = load_engine(config)?;
    let ctx = build_context(args)?;
    let results = engine.recommendations(&ctx);

    if !results.is_empty() {
        let mut tracker = open_tracker(config);
        tracker.record_impression(results.len() as u64);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    print_recommendations(&results);
    Ok(())
}

pub fn print_recommendations(results: &[EnhancedProduct]) {
    if results.is_empty() {
        println!("No product recommendations available.");
        return;
    }

    for (i, item) in results.iter().enumerate() {
        let p = &item.product;
        println!("{}. {}  {}  ★ {:.1}", i + 1, p.name, p.price, p.rating);
        println!("   {}", p.description);
        println!("   {}", item.affiliate_url);
        println!();
    }
}

pub fn run_catalog(config: &Config) -> Result<()> {
    let engine = load_engine(config)?;

    for section in engine.catalog().sections() {
        println!("{}", section.name);
        for p in &section.products {
            println!(
                "  {:<12} {:<36} {:>10}  ★ {:.1}",
                p.id, p.name, p.price.display(), p.rating
            );
        }
        println!();
    }
    println!("{} products", engine.catalog().len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dreamcar_core::recommend::{BuildType, VehicleContext};

    #[test]
    fn test_flags_only() {
        let ctx = build_context(&RecommendArgs {
            build_type: Some("Track".to_string()),
            vehicle: Some("Ford Mustang".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(ctx.build_type, Some(BuildType::Track));
        assert_eq!(
            ctx.vehicle,
            Some(VehicleContext::Text("Ford Mustang".to_string()))
        );
        assert_eq!(ctx.category, None);
    }

    #[test]
    fn test_flags_override_page_preset() {
        let ctx = build_context(&RecommendArgs {
            page: Some("gallery".to_string()),
            category: Some("interior".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(ctx.category.as_deref(), Some("interior"));
        assert_eq!(ctx.build_type, Some(BuildType::Show));
        assert_eq!(ctx.keywords.len(), 4);
    }

    #[test]
    fn test_empty_flag_clears_facet() {
        let ctx = build_context(&RecommendArgs {
            page: Some("homepage".to_string()),
            build_type: Some(String::new()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(ctx.build_type, None);
    }

    #[test]
    fn test_unknown_page() {
        let err = build_context(&RecommendArgs {
            page: Some("checkout".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("Unknown page"));
    }
}
