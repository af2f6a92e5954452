//! Rule-based product recommendations.
//!
//! The engine operates entirely on an immutable [`Catalog`] and
//! [`AffiliateConfig`] supplied at construction. It holds no mutable state,
//! so a single instance can be shared freely between call sites.
//!
//! # Matching Pipeline
//!
//! 1. Flatten the catalog (section order, then product order).
//! 2. `category` → keep products whose category contains it.
//! 3. `build_type` → keep products with a keyword containing one of the
//!    build type's relevant keywords.
//! 4. `vehicle` → keep universal products and products whose compatible
//!    vehicle names appear in the vehicle string.
//! 5. `keywords` → keep products with a keyword containing any query keyword.
//! 6. Stable sort by rating (desc), so ties keep catalog order.
//! 7. Truncate to [`MAX_RECOMMENDATIONS`].
//! 8. Attach affiliate URL, image URL, and numeric price.
//!
//! Every comparison is case-insensitive. Filters compose: each one narrows
//! the output of the previous, and an empty intermediate set yields an empty
//! result rather than an error.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::affiliate::AffiliateConfig;
use crate::catalog::{Catalog, Product};
use crate::vin::VehicleRecord;

/// Maximum number of recommendations returned per query.
pub const MAX_RECOMMENDATIONS: usize = 6;

/// Style of build the user is working towards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BuildType {
    Track,
    Drift,
    Drag,
    Street,
    Show,
    Autocross,
    /// Any label outside the known set, kept verbatim.
    Unrecognized(String),
}

impl BuildType {
    /// Parse a build type label, ignoring case.
    pub fn parse(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "track" => Self::Track,
            "drift" => Self::Drift,
            "drag" => Self::Drag,
            "street" => Self::Street,
            "show" => Self::Show,
            "autocross" => Self::Autocross,
            _ => Self::Unrecognized(label.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Track => "track",
            Self::Drift => "drift",
            Self::Drag => "drag",
            Self::Street => "street",
            Self::Show => "show",
            Self::Autocross => "autocross",
            Self::Unrecognized(label) => label,
        }
    }

    /// Product keywords that make a part relevant to this build.
    ///
    /// Unrecognized build types have none, which filters out every product.
    pub fn relevant_keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Track => &["suspension", "brakes", "aero", "engine", "racing"],
            Self::Drift => &["suspension", "tires", "differential", "angle kit"],
            Self::Drag => &["engine", "transmission", "tires", "nitrous"],
            Self::Street => &["intake", "exhaust", "wheels", "lighting"],
            Self::Show => &["exterior", "interior", "lighting", "wheels"],
            Self::Autocross => &["suspension", "tires", "brakes", "sway bar"],
            Self::Unrecognized(_) => &[],
        }
    }
}

impl From<String> for BuildType {
    fn from(label: String) -> Self {
        Self::parse(&label)
    }
}

impl From<BuildType> for String {
    fn from(build_type: BuildType) -> Self {
        build_type.as_str().to_string()
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The vehicle a user picked in the build wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum VehicleSelection {
    /// Decoded from a VIN lookup.
    #[serde(rename_all = "camelCase")]
    Vin {
        display_name: String,
        vin: String,
        record: VehicleRecord,
    },
    /// Typed in by hand.
    Manual { description: String },
}

impl VehicleSelection {
    /// The string vehicle compatibility is matched against.
    pub fn display_string(&self) -> &str {
        match self {
            Self::Vin { display_name, .. } => display_name,
            Self::Manual { description } => description,
        }
    }

    pub fn record(&self) -> Option<&VehicleRecord> {
        match self {
            Self::Vin { record, .. } => Some(record),
            Self::Manual { .. } => None,
        }
    }
}

/// Vehicle facet of a recommendation query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VehicleContext {
    Text(String),
    Selected(VehicleSelection),
}

impl VehicleContext {
    fn display_string(&self) -> &str {
        match self {
            Self::Text(s) => s,
            Self::Selected(selection) => selection.display_string(),
        }
    }
}

/// Facts used to filter the catalog for one query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationContext {
    pub category: Option<String>,
    pub build_type: Option<BuildType>,
    pub vehicle: Option<VehicleContext>,
    pub keywords: Vec<String>,
}

impl RecommendationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a category. An empty string leaves the facet unset.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = non_empty(category.into());
        self
    }

    /// Restrict to a build type label. An empty string leaves the facet unset.
    pub fn with_build_type(mut self, label: &str) -> Self {
        self.build_type = non_empty(label.to_string()).map(|l| BuildType::parse(&l));
        self
    }

    /// Restrict to products fitting a free-text vehicle name.
    /// An empty string leaves the facet unset.
    pub fn with_vehicle_text(mut self, vehicle: impl Into<String>) -> Self {
        self.vehicle = non_empty(vehicle.into()).map(VehicleContext::Text);
        self
    }

    pub fn with_vehicle(mut self, selection: VehicleSelection) -> Self {
        self.vehicle = Some(VehicleContext::Selected(selection));
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// A product ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedProduct {
    #[serde(flatten)]
    pub product: Product,
    pub affiliate_url: String,
    pub image_url: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_numeric: Decimal,
}

/// Recommendation engine over a fixed catalog.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    catalog: Catalog,
    affiliate: AffiliateConfig,
}

impl RecommendationEngine {
    pub fn new(catalog: Catalog, affiliate: AffiliateConfig) -> Self {
        Self { catalog, affiliate }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn affiliate(&self) -> &AffiliateConfig {
        &self.affiliate
    }

    /// Ranked, display-ready recommendations for `ctx` (at most six).
    pub fn recommendations(&self, ctx: &RecommendationContext) -> Vec<EnhancedProduct> {
        let mut ranked = self.candidates(ctx);

        // sort_by is stable: equal ratings keep catalog order
        ranked.sort_by(|a, b| {
            b.rating
                .partial_cmp(&a.rating)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(MAX_RECOMMENDATIONS);

        let results: Vec<EnhancedProduct> = ranked.into_iter().map(|p| self.enhance(p)).collect();
        tracing::debug!(
            count = results.len(),
            category = ?ctx.category,
            build_type = ?ctx.build_type,
            "computed recommendations"
        );
        results
    }

    /// Products passing every filter in `ctx`, in catalog order, unranked and uncapped.
    pub fn candidates(&self, ctx: &RecommendationContext) -> Vec<&Product> {
        let mut products: Vec<&Product> = self.catalog.products().collect();

        if let Some(category) = &ctx.category {
            let needle = category.to_lowercase();
            products.retain(|p| p.category.to_lowercase().contains(&needle));
        }

        if let Some(build_type) = &ctx.build_type {
            let relevant = build_type.relevant_keywords();
            products.retain(|p| {
                p.keywords.iter().any(|kw| {
                    let kw = kw.to_lowercase();
                    relevant.iter().any(|r| kw.contains(r))
                })
            });
        }

        if let Some(vehicle) = &ctx.vehicle {
            let vehicle = vehicle.display_string().to_lowercase();
            products.retain(|p| {
                p.is_universal()
                    || p
                        .compatible_vehicles
                        .iter()
                        .any(|c| vehicle.contains(&c.to_lowercase()))
            });
        }

        if !ctx.keywords.is_empty() {
            let wanted: Vec<String> = ctx.keywords.iter().map(|k| k.to_lowercase()).collect();
            products.retain(|p| {
                p.keywords.iter().any(|kw| {
                    let kw = kw.to_lowercase();
                    wanted.iter().any(|w| kw.contains(w.as_str()))
                })
            });
        }

        products
    }

    /// Attach affiliate link, image URL, and numeric price to a product.
    pub fn enhance(&self, product: &Product) -> EnhancedProduct {
        EnhancedProduct {
            affiliate_url: self.affiliate.affiliate_url(&product.id),
            image_url: self.affiliate.image_url(&product.id),
            price_numeric: product.price.amount(),
            product: product.clone(),
        }
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(Catalog::default(), AffiliateConfig::default())
    }
}
