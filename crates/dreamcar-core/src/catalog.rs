//! Static product catalog.
//!
//! The catalog is a list of named sections (engine, suspension, …), each
//! holding [`Product`]s. Flattening walks sections in order and products in
//! order within each section; that sequence is the catalog order used to
//! break rating ties during ranking.
//!
//! A [`Catalog`] is validated once on construction and never mutated
//! afterwards:
//!
//! - product ids are unique across all sections,
//! - ratings lie in `[0.0, 5.0]`,
//! - every price string parses to a decimal amount (see [`Price`]).

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Compatibility wildcard: the product fits any vehicle.
pub const UNIVERSAL: &str = "universal";

/// Errors raised while building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate product id '{0}'")]
    DuplicateId(String),
    #[error("product '{id}' has rating {rating}, expected 0.0..=5.0")]
    RatingOutOfRange { id: String, rating: f64 },
    #[error("invalid price '{0}'")]
    InvalidPrice(String),
}

/// A display price together with its parsed amount.
///
/// Parsing strips the currency symbol and thousands separators, so
/// `"$1,299.99"` becomes `1299.99`. Serializes back to the display string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Price {
    display: String,
    amount: Decimal,
}

impl Price {
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

impl FromStr for Price {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = parse_amount(s).ok_or_else(|| CatalogError::InvalidPrice(s.to_string()))?;
        Ok(Self {
            display: s.to_string(),
            amount,
        })
    }
}

fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s.chars().filter(|c| !matches!(c, '$' | ',')).collect();
    Decimal::from_str(cleaned.trim()).ok()
}

impl TryFrom<String> for Price {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Price> for String {
    fn from(price: Price) -> Self {
        price.display
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

/// A recommendable product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// External catalog identifier (ASIN).
    pub id: String,
    pub name: String,
    /// Display category, e.g. `"Engine"` or `"Aerodynamics"`.
    pub category: String,
    pub price: Price,
    pub rating: f64,
    pub description: String,
    pub keywords: Vec<String>,
    /// Vehicle names this product fits; may contain [`UNIVERSAL`].
    pub compatible_vehicles: Vec<String>,
}

impl Product {
    pub fn is_universal(&self) -> bool {
        self.compatible_vehicles.iter().any(|v| v == UNIVERSAL)
    }
}

/// A named group of products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSection {
    pub name: String,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Validated, immutable product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    sections: Vec<CatalogSection>,
}

impl Catalog {
    pub fn new(sections: Vec<CatalogSection>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for product in sections.iter().flat_map(|s| &s.products) {
            if !seen.insert(product.id.as_str()) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
            if !(0.0..=5.0).contains(&product.rating) {
                return Err(CatalogError::RatingOutOfRange {
                    id: product.id.clone(),
                    rating: product.rating,
                });
            }
        }
        Ok(Self { sections })
    }

    pub fn sections(&self) -> &[CatalogSection] {
        &self.sections
    }

    /// All products in catalog order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.sections.iter().flat_map(|s| s.products.iter())
    }

    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.products.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products().find(|p| p.id == id)
    }
}

impl Default for Catalog {
    /// The built-in catalog shipped with the site.
    fn default() -> Self {
        Self {
            sections: default_sections(),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    name: &str,
    category: &str,
    price: &str,
    rating: f64,
    description: &str,
    keywords: &[&str],
    compatible_vehicles: &[&str],
) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        price: Price {
            display: price.to_string(),
            amount: parse_amount(price).unwrap_or_default(),
        },
        rating,
        description: description.to_string(),
        keywords: keywords.iter().map(|s| s.to_string()).collect(),
        compatible_vehicles: compatible_vehicles.iter().map(|s| s.to_string()).collect(),
    }
}

fn default_sections() -> Vec<CatalogSection> {
    vec![
        CatalogSection {
            name: "engine".to_string(),
            products: vec![
                product(
                    "B075ZQVQZ1",
                    "K&N Cold Air Intake Kit",
                    "Engine",
                    "$329.99",
                    4.5,
                    "High-Performance Cold Air Intake System",
                    &["intake", "cold air", "performance", "horsepower"],
                    &["Honda Civic", "Subaru WRX", "Ford Mustang"],
                ),
                product(
                    "B00JGZM6G8",
                    "Borla ATAK Cat-Back Exhaust",
                    "Exhaust",
                    "$899.99",
                    4.7,
                    "Aggressive Sound Cat-Back Exhaust System",
                    &["exhaust", "borla", "catback", "performance", "sound"],
                    &["Ford Mustang", "Chevrolet Camaro", "Dodge Charger"],
                ),
                product(
                    "B08K4X7QRY",
                    "NGK Iridium IX Spark Plugs",
                    "Engine",
                    "$89.99",
                    4.8,
                    "High-Performance Iridium Spark Plugs Set",
                    &["spark plugs", "ngk", "iridium", "performance"],
                    &[UNIVERSAL],
                ),
            ],
        },
        CatalogSection {
            name: "suspension".to_string(),
            products: vec![
                product(
                    "B01N4QZ8ZX",
                    "Coilover Suspension Kit",
                    "Suspension",
                    "$1299.99",
                    4.6,
                    "Adjustable Height Coilover Suspension",
                    &["coilovers", "suspension", "adjustable", "lowering"],
                    &["Honda Civic", "Subaru WRX", "BMW 3 Series"],
                ),
                product(
                    "B07YD8MXTG",
                    "Sway Bar Links Set",
                    "Suspension",
                    "$129.99",
                    4.4,
                    "Heavy Duty Sway Bar End Links",
                    &["sway bar", "links", "handling", "stability"],
                    &[UNIVERSAL],
                ),
            ],
        },
        CatalogSection {
            name: "exterior".to_string(),
            products: vec![
                product(
                    "B08XYZHMT4",
                    "Carbon Fiber Front Splitter",
                    "Aerodynamics",
                    "$599.99",
                    4.3,
                    "Real Carbon Fiber Front Lip Splitter",
                    &["carbon fiber", "splitter", "aero", "front lip"],
                    &["BMW M3", "Audi S4", "Mercedes C63"],
                ),
                product(
                    "B07MNKQS5Z",
                    "LED Headlight Conversion Kit",
                    "Lighting",
                    "$199.99",
                    4.5,
                    "Plug-and-Play LED Headlight Bulbs",
                    &["led", "headlights", "lighting", "conversion"],
                    &[UNIVERSAL],
                ),
            ],
        },
        CatalogSection {
            name: "interior".to_string(),
            products: vec![
                product(
                    "B08GY2J4QN",
                    "Racing Bucket Seats",
                    "Interior",
                    "$899.99",
                    4.6,
                    "Carbon Fiber Racing Bucket Seats Pair",
                    &["racing seats", "bucket seats", "carbon fiber"],
                    &[UNIVERSAL],
                ),
                product(
                    "B07Q2R8KPJ",
                    "Performance Steering Wheel",
                    "Interior",
                    "$299.99",
                    4.4,
                    "Suede Racing Steering Wheel",
                    &["steering wheel", "racing", "suede", "performance"],
                    &[UNIVERSAL],
                ),
            ],
        },
        CatalogSection {
            name: "tools".to_string(),
            products: vec![
                product(
                    "B07NNFM8JY",
                    "OBD2 Scanner Tool",
                    "Diagnostics",
                    "$129.99",
                    4.7,
                    "Professional OBD2 Diagnostic Scanner",
                    &["obd2", "scanner", "diagnostic", "tool"],
                    &[UNIVERSAL],
                ),
                product(
                    "B08X1BK3YZ",
                    "Torque Wrench Set",
                    "Tools",
                    "$199.99",
                    4.8,
                    "Professional Torque Wrench Set 1/4\" 3/8\" 1/2\"",
                    &["torque wrench", "tools", "professional", "set"],
                    &[UNIVERSAL],
                ),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_shape() {
        let catalog = Catalog::default();
        assert_eq!(catalog.len(), 11);
        assert_eq!(catalog.sections().len(), 5);
        let first: Vec<&str> = catalog.products().take(3).map(|p| p.id.as_str()).collect();
        assert_eq!(first, vec!["B075ZQVQZ1", "B00JGZM6G8", "B08K4X7QRY"]);
    }

    #[test]
    fn test_default_catalog_passes_validation() {
        let sections = Catalog::default().sections().to_vec();
        assert!(Catalog::new(sections).is_ok());
    }

    #[test]
    fn test_price_parsing() {
        let price: Price = "$899.99".parse().unwrap();
        assert_eq!(price.amount(), Decimal::new(89999, 2));
        assert_eq!(price.display(), "$899.99");

        let price: Price = "$1,299.99".parse().unwrap();
        assert_eq!(price.amount(), Decimal::new(129999, 2));
    }

    #[test]
    fn test_price_rejects_garbage() {
        assert!("call for price".parse::<Price>().is_err());
        assert!("".parse::<Price>().is_err());
    }

    #[test]
    fn test_default_prices_match_display() {
        for p in Catalog::default().products() {
            let reparsed: Price = p.price.display().parse().unwrap();
            assert_eq!(reparsed.amount(), p.price.amount(), "price of {}", p.id);
        }
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut sections = Catalog::default().sections().to_vec();
        let dup = sections[0].products[0].clone();
        sections[4].products.push(dup);
        let err = Catalog::new(sections).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == "B075ZQVQZ1"));
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        let mut sections = Catalog::default().sections().to_vec();
        sections[1].products[0].rating = 5.5;
        assert!(matches!(
            Catalog::new(sections),
            Err(CatalogError::RatingOutOfRange { .. })
        ));
    }

    #[test]
    fn test_product_deserializes_price_string() {
        let json = r#"{
            "id": "X1",
            "name": "Test",
            "category": "Tools",
            "price": "$1,050.00",
            "rating": 4.0,
            "description": "d",
            "keywords": ["tool"],
            "compatibleVehicles": ["universal"]
        }"#;
        let p: Product = serde_json::from_str(json).unwrap();
        assert_eq!(p.price.amount(), Decimal::new(105000, 2));
        assert!(p.is_universal());

        let out = serde_json::to_value(&p).unwrap();
        assert_eq!(out["price"], "$1,050.00");
    }

    #[test]
    fn test_get_by_id() {
        let catalog = Catalog::default();
        assert_eq!(catalog.get("B07NNFM8JY").unwrap().name, "OBD2 Scanner Tool");
        assert!(catalog.get("nope").is_none());
    }
}
