//! Affiliate link and product image URL construction.
//!
//! Links take the form
//!
//! ```text
//! <base_url>/dp/<product_id>?tag=<associate_tag>&linkCode=as2&camp=1789&creative=9325
//! ```
//!
//! and images
//!
//! ```text
//! <image_host>/images/P/<product_id>.01<image_size>.jpg
//! ```
//!
//! Query values are percent-encoded with `application/x-www-form-urlencoded`
//! rules.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

const LINK_CODE: &str = "as2";
const CAMPAIGN_ID: &str = "1789";
const CREATIVE_ID: &str = "9325";

/// Affiliate program settings, fixed for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliateConfig {
    #[serde(default = "default_associate_tag")]
    pub associate_tag: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_host")]
    pub image_host: String,
    /// Size suffix spliced into image file names, e.g. `_SX300_`.
    #[serde(default = "default_image_size")]
    pub image_size: String,
}

fn default_associate_tag() -> String {
    "dreamcar-20".to_string()
}
fn default_base_url() -> String {
    "https://www.amazon.com".to_string()
}
fn default_image_host() -> String {
    "https://images-na.ssl-images-amazon.com".to_string()
}
fn default_image_size() -> String {
    "_SX300_".to_string()
}

impl Default for AffiliateConfig {
    fn default() -> Self {
        Self {
            associate_tag: default_associate_tag(),
            base_url: default_base_url(),
            image_host: default_image_host(),
            image_size: default_image_size(),
        }
    }
}

impl AffiliateConfig {
    /// Affiliate link for a product with the standard parameter set.
    pub fn affiliate_url(&self, product_id: &str) -> String {
        self.affiliate_url_with(product_id, &[])
    }

    /// Affiliate link with extra query parameters.
    ///
    /// A parameter whose key matches a standard one replaces its value in
    /// place; new keys are appended in the order given.
    pub fn affiliate_url_with(&self, product_id: &str, extra: &[(&str, &str)]) -> String {
        let mut params: Vec<(&str, &str)> = vec![
            ("tag", self.associate_tag.as_str()),
            ("linkCode", LINK_CODE),
            ("camp", CAMPAIGN_ID),
            ("creative", CREATIVE_ID),
        ];
        for &(key, value) in extra {
            match params.iter_mut().find(|(k, _)| *k == key) {
                Some(existing) => existing.1 = value,
                None => params.push((key, value)),
            }
        }

        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params)
            .finish();

        format!(
            "{}/dp/{}?{}",
            self.base_url.trim_end_matches('/'),
            product_id,
            query
        )
    }

    /// Product image URL at the configured size.
    pub fn image_url(&self, product_id: &str) -> String {
        self.image_url_sized(product_id, &self.image_size)
    }

    pub fn image_url_sized(&self, product_id: &str, size: &str) -> String {
        format!(
            "{}/images/P/{}.01{}.jpg",
            self.image_host.trim_end_matches('/'),
            product_id,
            size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_affiliate_url() {
        let config = AffiliateConfig::default();
        assert_eq!(
            config.affiliate_url("B00JGZM6G8"),
            "https://www.amazon.com/dp/B00JGZM6G8?tag=dreamcar-20&linkCode=as2&camp=1789&creative=9325"
        );
    }

    #[test]
    fn test_tag_is_percent_encoded() {
        let config = AffiliateConfig {
            associate_tag: "shop&co=1".to_string(),
            ..Default::default()
        };
        let url = config.affiliate_url("X");
        assert!(url.contains("tag=shop%26co%3D1&"), "{}", url);
    }

    #[test]
    fn test_extra_params_override_and_append() {
        let config = AffiliateConfig::default();
        let url = config.affiliate_url_with("X", &[("camp", "42"), ("ref", "builder")]);
        assert_eq!(
            url,
            "https://www.amazon.com/dp/X?tag=dreamcar-20&linkCode=as2&camp=42&creative=9325&ref=builder"
        );
    }

    #[test]
    fn test_trailing_slash_on_base() {
        let config = AffiliateConfig {
            base_url: "https://www.amazon.co.uk/".to_string(),
            ..Default::default()
        };
        assert!(config
            .affiliate_url("X")
            .starts_with("https://www.amazon.co.uk/dp/X?"));
    }

    #[test]
    fn test_image_url() {
        let config = AffiliateConfig::default();
        assert_eq!(
            config.image_url("B08K4X7QRY"),
            "https://images-na.ssl-images-amazon.com/images/P/B08K4X7QRY.01_SX300_.jpg"
        );
        assert_eq!(
            config.image_url_sized("B08K4X7QRY", "_SL500_"),
            "https://images-na.ssl-images-amazon.com/images/P/B08K4X7QRY.01_SL500_.jpg"
        );
    }
}
