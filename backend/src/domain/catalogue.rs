//! Scooter catalogue: models, variants, colours and comparisons.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use super::{Error, ProductId, Slug};

/// Fewest models a comparison accepts.
pub const COMPARE_MIN: usize = 2;
/// Most models a comparison accepts.
pub const COMPARE_MAX: usize = 3;
/// Maximum characters in a product tagline.
pub const TAGLINE_MAX: usize = 160;

/// Price in minor currency units (paise, cents).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    #[schema(example = 11_499_900)]
    pub amount_minor: i64,
    #[schema(example = "INR")]
    pub currency: String,
}

/// A `#RRGGBB` colour swatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "#1A2B3C")]
pub struct HexColor(String);

/// Colour code was not `#RRGGBB`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("colour must be a #RRGGBB hex code, got {0:?}")]
pub struct InvalidHexColor(String);

impl HexColor {
    /// Validate a hex colour; the stored form is upper-case.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidHexColor> {
        let raw = raw.into();
        let valid = raw.len() == 7
            && raw.starts_with('#')
            && raw.chars().skip(1).all(|ch| ch.is_ascii_hexdigit());
        if valid {
            Ok(Self(raw.to_ascii_uppercase()))
        } else {
            Err(InvalidHexColor(raw))
        }
    }
}

impl TryFrom<String> for HexColor {
    type Error = InvalidHexColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.0
    }
}

impl AsRef<str> for HexColor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Trim level of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: uuid::Uuid,
    pub name: String,
    pub price: Money,
    pub range_km: u32,
    pub battery_kwh: f64,
}

/// Paint option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductColor {
    pub id: uuid::Uuid,
    pub name: String,
    pub hex: HexColor,
}

/// Scooter model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[schema(value_type = String, example = "volt-s1-pro")]
    pub slug: Slug,
    pub name: String,
    pub tagline: Option<String>,
    pub price: Money,
    pub range_km: u32,
    pub top_speed_kmh: u32,
    pub battery_kwh: f64,
    pub charge_time_hours: f64,
    pub active: bool,
    pub sort_order: i32,
    pub variants: Vec<ProductVariant>,
    pub colors: Vec<ProductColor>,
    pub hero_image_url: Option<String>,
}

/// Admin edits to a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductUpdate {
    price_minor: Option<i64>,
    active: Option<bool>,
    tagline: Option<String>,
}

/// Product patch was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductUpdateError {
    /// No fields supplied.
    #[error("at least one of price, active or tagline must be provided")]
    Empty,
    /// Price was zero or negative.
    #[error("price must be positive")]
    NonPositivePrice,
    /// Tagline exceeded [`TAGLINE_MAX`].
    #[error("tagline must be at most {TAGLINE_MAX} characters")]
    TaglineTooLong,
}

impl super::validation::FieldViolation for ProductUpdateError {
    fn code(&self) -> &'static str {
        match self {
            Self::Empty => "empty_update",
            Self::NonPositivePrice => "invalid_price",
            Self::TaglineTooLong => "too_long",
        }
    }
}

impl ProductUpdate {
    /// Validate and build a product patch.
    pub fn new(
        price_minor: Option<i64>,
        active: Option<bool>,
        tagline: Option<String>,
    ) -> Result<Self, ProductUpdateError> {
        if price_minor.is_none() && active.is_none() && tagline.is_none() {
            return Err(ProductUpdateError::Empty);
        }
        if price_minor.is_some_and(|price| price <= 0) {
            return Err(ProductUpdateError::NonPositivePrice);
        }
        let tagline = tagline.map(|text| text.trim().to_owned());
        if tagline
            .as_ref()
            .is_some_and(|text| text.chars().count() > TAGLINE_MAX)
        {
            return Err(ProductUpdateError::TaglineTooLong);
        }
        Ok(Self {
            price_minor,
            active,
            tagline,
        })
    }

    /// New price in minor units.
    #[must_use]
    pub const fn price_minor(&self) -> Option<i64> {
        self.price_minor
    }

    /// New visibility flag.
    #[must_use]
    pub const fn active(&self) -> Option<bool> {
        self.active
    }

    /// New tagline.
    #[must_use]
    pub fn tagline(&self) -> Option<&str> {
        self.tagline.as_deref()
    }
}

/// Parse the `slugs` query parameter of the comparison endpoint.
///
/// Accepts a comma separated list of two or three distinct slugs; order is
/// preserved.
///
/// # Examples
/// ```
/// use site_backend::domain::parse_comparison;
///
/// let slugs = parse_comparison("volt-s1, volt-s1-pro").unwrap();
/// assert_eq!(slugs.len(), 2);
/// assert!(parse_comparison("volt-s1").is_err());
/// ```
pub fn parse_comparison(raw: &str) -> Result<Vec<Slug>, Error> {
    let mut seen = HashSet::new();
    let mut slugs = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        let slug = Slug::new(part).map_err(|err| {
            Error::invalid_request(format!("invalid slug {part:?}: {err}"))
                .with_details(json!({ "field": "slugs", "code": "invalid_slug" }))
        })?;
        if !seen.insert(slug.clone()) {
            return Err(Error::invalid_request(format!("duplicate slug {part:?}"))
                .with_details(json!({ "field": "slugs", "code": "duplicate" })));
        }
        slugs.push(slug);
    }
    if !(COMPARE_MIN..=COMPARE_MAX).contains(&slugs.len()) {
        return Err(Error::invalid_request(format!(
            "compare between {COMPARE_MIN} and {COMPARE_MAX} models"
        ))
        .with_details(json!({ "field": "slugs", "code": "invalid_count" })));
    }
    Ok(slugs)
}

/// Arrange `found` in the order of `requested`, reporting absentees.
pub fn order_comparison(requested: &[Slug], found: Vec<Product>) -> Result<Vec<Product>, Error> {
    let mut pool = found;
    let mut ordered = Vec::with_capacity(requested.len());
    let mut missing = Vec::new();
    for slug in requested {
        match pool.iter().position(|product| &product.slug == slug) {
            Some(index) => ordered.push(pool.swap_remove(index)),
            None => missing.push(slug.to_string()),
        }
    }
    if missing.is_empty() {
        Ok(ordered)
    } else {
        Err(Error::not_found("one or more models were not found")
            .with_details(json!({ "missing": missing })))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Minimal active product for tests.
    pub(crate) fn product(slug: &str) -> Product {
        Product {
            id: ProductId::generate(),
            slug: Slug::new(slug).expect("fixture slug"),
            name: slug.to_uppercase(),
            tagline: None,
            price: Money {
                amount_minor: 9_999_900,
                currency: "INR".into(),
            },
            range_km: 120,
            top_speed_kmh: 80,
            battery_kwh: 3.2,
            charge_time_hours: 5.5,
            active: true,
            sort_order: 0,
            variants: Vec::new(),
            colors: Vec::new(),
            hero_image_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::product;
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("a,b")]
    #[case(" a , b , c ")]
    fn accepts_two_or_three(#[case] raw: &str) {
        assert!(parse_comparison(raw).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("a")]
    #[case("a,b,c,d")]
    #[case("a,a")]
    #[case("a,B")]
    fn rejects_bad_lists(#[case] raw: &str) {
        let err = parse_comparison(raw).expect_err("invalid list");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn ordering_follows_request() {
        let requested = parse_comparison("b,a").expect("slugs");
        let ordered = order_comparison(&requested, vec![product("a"), product("b")])
            .expect("all present");
        let slugs: Vec<_> = ordered.iter().map(|p| p.slug.to_string()).collect();
        assert_eq!(slugs, ["b", "a"]);
    }

    #[rstest]
    fn missing_models_are_listed() {
        let requested = parse_comparison("a,b,c").expect("slugs");
        let err = order_comparison(&requested, vec![product("b")]).expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.details(), Some(&json!({ "missing": ["a", "c"] })));
    }

    #[rstest]
    #[case("#a1b2c3", true)]
    #[case("#A1B2C3", true)]
    #[case("a1b2c3", false)]
    #[case("#a1b2c", false)]
    #[case("#g1b2c3", false)]
    fn hex_colours(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(HexColor::new(raw).is_ok(), ok);
    }

    #[rstest]
    #[case(None, None, None, Err(ProductUpdateError::Empty))]
    #[case(Some(0), None, None, Err(ProductUpdateError::NonPositivePrice))]
    #[case(None, Some(false), None, Ok(()))]
    #[case(Some(1), None, Some("Go further".to_owned()), Ok(()))]
    fn product_updates(
        #[case] price: Option<i64>,
        #[case] active: Option<bool>,
        #[case] tagline: Option<String>,
        #[case] expected: Result<(), ProductUpdateError>,
    ) {
        assert_eq!(ProductUpdate::new(price, active, tagline).map(|_| ()), expected);
    }
}
