//! Row shapes as PostgREST returns them (snake_case columns).
//!
//! Rows decode into these DTOs first and are then mapped to domain records
//! in one pass, so a legacy row that no longer satisfies a domain invariant
//! surfaces as a decode error instead of leaking into responses.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::domain::{
    BlogPost, BlogPostSummary, Booking, BookingId, BookingStatus, City, Dealer, DealerId,
    EmailAddress, Faq, GeoPoint, HexColor, Lead, LeadId, LeadSource, LeadStatus, Money,
    NewBooking, NewLead, PersonName, PhoneNumber, Product, ProductColor, ProductId,
    ProductVariant, Slug, TimeSlot,
};

/// Insert payload for `leads`.
#[derive(Debug, Serialize)]
pub(super) struct LeadInsert<'a> {
    id: LeadId,
    name: &'a PersonName,
    email: &'a EmailAddress,
    phone: &'a PhoneNumber,
    city: Option<&'a City>,
    model_slug: Option<&'a Slug>,
    message: Option<&'a str>,
    source: LeadSource,
    consent: bool,
    status: LeadStatus,
}

impl<'a> From<&'a NewLead> for LeadInsert<'a> {
    fn from(lead: &'a NewLead) -> Self {
        Self {
            id: lead.id,
            name: &lead.name,
            email: &lead.email,
            phone: &lead.phone,
            city: lead.city.as_ref(),
            model_slug: lead.model_slug.as_ref(),
            message: lead.message.as_deref(),
            source: lead.source,
            consent: lead.consent,
            status: LeadStatus::New,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct LeadRow {
    id: LeadId,
    name: PersonName,
    email: EmailAddress,
    phone: PhoneNumber,
    city: Option<City>,
    model_slug: Option<Slug>,
    message: Option<String>,
    #[serde(default)]
    source: LeadSource,
    #[serde(default)]
    consent: bool,
    status: LeadStatus,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LeadRow> for Lead {
    fn from(row: LeadRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            city: row.city,
            model_slug: row.model_slug,
            message: row.message,
            source: row.source,
            consent: row.consent,
            status: row.status,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insert payload for `bookings`.
#[derive(Debug, Serialize)]
pub(super) struct BookingInsert<'a> {
    id: BookingId,
    name: &'a PersonName,
    email: &'a EmailAddress,
    phone: &'a PhoneNumber,
    city: &'a City,
    model_slug: &'a Slug,
    preferred_date: NaiveDate,
    time_slot: TimeSlot,
    dealer_id: Option<DealerId>,
    notes: Option<&'a str>,
    status: BookingStatus,
}

impl<'a> From<&'a NewBooking> for BookingInsert<'a> {
    fn from(booking: &'a NewBooking) -> Self {
        Self {
            id: booking.id,
            name: &booking.name,
            email: &booking.email,
            phone: &booking.phone,
            city: &booking.city,
            model_slug: &booking.model_slug,
            preferred_date: booking.preferred_date.date(),
            time_slot: booking.time_slot,
            dealer_id: booking.dealer_id,
            notes: booking.notes.as_deref(),
            status: BookingStatus::Pending,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct BookingRow {
    id: BookingId,
    name: PersonName,
    email: EmailAddress,
    phone: PhoneNumber,
    city: City,
    model_slug: Slug,
    preferred_date: NaiveDate,
    time_slot: TimeSlot,
    dealer_id: Option<DealerId>,
    notes: Option<String>,
    status: BookingStatus,
    admin_notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            city: row.city,
            model_slug: row.model_slug,
            preferred_date: row.preferred_date,
            time_slot: row.time_slot,
            dealer_id: row.dealer_id,
            notes: row.notes,
            status: row.status,
            admin_notes: row.admin_notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// `select` clause embedding a product's variants and colours.
pub(super) const PRODUCT_SELECT: &str = "*,product_variants(*),product_colors(*)";

#[derive(Debug, Deserialize)]
pub(super) struct ProductRow {
    id: ProductId,
    slug: Slug,
    name: String,
    tagline: Option<String>,
    price_minor: i64,
    currency: String,
    range_km: u32,
    top_speed_kmh: u32,
    battery_kwh: f64,
    charge_time_hours: f64,
    active: bool,
    #[serde(default)]
    sort_order: i32,
    hero_image_url: Option<String>,
    #[serde(default)]
    product_variants: Vec<VariantRow>,
    #[serde(default)]
    product_colors: Vec<ColorRow>,
}

#[derive(Debug, Deserialize)]
struct VariantRow {
    id: Uuid,
    name: String,
    price_minor: i64,
    range_km: u32,
    battery_kwh: f64,
    #[serde(default)]
    sort_order: i32,
}

#[derive(Debug, Deserialize)]
struct ColorRow {
    id: Uuid,
    name: String,
    hex: HexColor,
    #[serde(default)]
    sort_order: i32,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        let mut variants = row.product_variants;
        variants.sort_by_key(|variant| (variant.sort_order, variant.price_minor));
        let mut colors = row.product_colors;
        colors.sort_by_key(|color| color.sort_order);
        let currency = row.currency;
        Self {
            id: row.id,
            slug: row.slug,
            name: row.name,
            tagline: row.tagline,
            price: Money {
                amount_minor: row.price_minor,
                currency: currency.clone(),
            },
            range_km: row.range_km,
            top_speed_kmh: row.top_speed_kmh,
            battery_kwh: row.battery_kwh,
            charge_time_hours: row.charge_time_hours,
            active: row.active,
            sort_order: row.sort_order,
            variants: variants
                .into_iter()
                .map(|variant| ProductVariant {
                    id: variant.id,
                    name: variant.name,
                    price: Money {
                        amount_minor: variant.price_minor,
                        currency: currency.clone(),
                    },
                    range_km: variant.range_km,
                    battery_kwh: variant.battery_kwh,
                })
                .collect(),
            colors: colors
                .into_iter()
                .map(|color| ProductColor {
                    id: color.id,
                    name: color.name,
                    hex: color.hex,
                })
                .collect(),
            hero_image_url: row.hero_image_url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct DealerRow {
    id: DealerId,
    name: String,
    city: String,
    state: String,
    address: String,
    phone: String,
    email: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    opening_hours: Option<String>,
}

impl From<DealerRow> for Dealer {
    fn from(row: DealerRow) -> Self {
        let location = match (row.latitude, row.longitude) {
            (Some(lat), Some(lng)) => GeoPoint::new(lat, lng)
                .map_err(|err| warn!(dealer_id = %row.id, %err, "ignoring invalid dealer coordinates"))
                .ok(),
            _ => None,
        };
        Self {
            id: row.id,
            name: row.name,
            city: row.city,
            state: row.state,
            address: row.address,
            phone: row.phone,
            email: row.email,
            location,
            opening_hours: row.opening_hours,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct FaqRow {
    id: Uuid,
    question: String,
    answer: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    sort_order: i32,
}

/// Category given to FAQs stored without one.
pub(super) const DEFAULT_FAQ_CATEGORY: &str = "General";

impl From<FaqRow> for Faq {
    fn from(row: FaqRow) -> Self {
        Self {
            id: row.id,
            question: row.question,
            answer: row.answer,
            category: row
                .category
                .filter(|category| !category.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FAQ_CATEGORY.to_owned()),
            sort_order: row.sort_order,
        }
    }
}

/// Columns needed for listing cards.
pub(super) const POST_SUMMARY_SELECT: &str = "slug,title,excerpt,cover_image_url,published_at";

#[derive(Debug, Deserialize)]
pub(super) struct PostSummaryRow {
    slug: Slug,
    title: String,
    #[serde(default)]
    excerpt: Option<String>,
    cover_image_url: Option<String>,
    published_at: DateTime<Utc>,
}

impl From<PostSummaryRow> for BlogPostSummary {
    fn from(row: PostSummaryRow) -> Self {
        Self {
            slug: row.slug,
            title: row.title,
            excerpt: row.excerpt.unwrap_or_default(),
            cover_image_url: row.cover_image_url,
            published_at: row.published_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct PostRow {
    #[serde(flatten)]
    summary: PostSummaryRow,
    #[serde(default)]
    body: String,
    author: Option<String>,
}

impl From<PostRow> for BlogPost {
    fn from(row: PostRow) -> Self {
        Self {
            summary: row.summary.into(),
            body: row.body,
            author: row.author,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn product_rows_embed_sorted_variants_and_colours() {
        let row: ProductRow = serde_json::from_value(json!({
            "id": "0b9c2a1e-7c1d-4a8e-9b70-3f5b8c1d2e4f",
            "slug": "volt-s1",
            "name": "Volt S1",
            "tagline": null,
            "price_minor": 9_999_900,
            "currency": "INR",
            "range_km": 120,
            "top_speed_kmh": 80,
            "battery_kwh": 3.2,
            "charge_time_hours": 5.5,
            "active": true,
            "sort_order": 1,
            "hero_image_url": null,
            "product_variants": [
                {"id": "6a2f7f0e-1111-4c8e-9b70-3f5b8c1d2e4f", "name": "Pro", "price_minor": 12_999_900, "range_km": 170, "battery_kwh": 4.0, "sort_order": 2},
                {"id": "6a2f7f0e-2222-4c8e-9b70-3f5b8c1d2e4f", "name": "Base", "price_minor": 9_999_900, "range_km": 120, "battery_kwh": 3.2, "sort_order": 1}
            ],
            "product_colors": [
                {"id": "6a2f7f0e-3333-4c8e-9b70-3f5b8c1d2e4f", "name": "Midnight", "hex": "#0a0a23"}
            ]
        }))
        .expect("row decodes");
        let product = Product::from(row);
        assert_eq!(product.variants[0].name, "Base");
        assert_eq!(product.variants[1].price.currency, "INR");
        assert_eq!(product.colors[0].hex.as_ref(), "#0A0A23");
    }

    #[test]
    fn dealers_with_bad_coordinates_lose_their_location() {
        let row: DealerRow = serde_json::from_value(json!({
            "id": "0b9c2a1e-7c1d-4a8e-9b70-3f5b8c1d2e4f",
            "name": "Volt Andheri",
            "city": "Mumbai",
            "state": "Maharashtra",
            "address": "1 Link Road",
            "phone": "+912212345678",
            "email": null,
            "latitude": 123.0,
            "longitude": 72.8,
            "opening_hours": null
        }))
        .expect("row decodes");
        assert!(Dealer::from(row).location.is_none());
    }

    #[test]
    fn legacy_leads_with_invalid_emails_fail_to_decode() {
        let result: Result<LeadRow, _> = serde_json::from_value(json!({
            "id": "0b9c2a1e-7c1d-4a8e-9b70-3f5b8c1d2e4f",
            "name": "Asha Rao",
            "email": "not-an-email",
            "phone": "9876543210",
            "city": null,
            "model_slug": null,
            "message": null,
            "status": "new",
            "notes": null,
            "created_at": "2025-03-01T10:00:00Z",
            "updated_at": "2025-03-01T10:00:00Z"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn blank_faq_categories_fall_back() {
        let row: FaqRow = serde_json::from_value(json!({
            "id": "0b9c2a1e-7c1d-4a8e-9b70-3f5b8c1d2e4f",
            "question": "Range?",
            "answer": "Up to 170 km.",
            "category": " ",
            "sort_order": 3
        }))
        .expect("row decodes");
        assert_eq!(Faq::from(row).category, DEFAULT_FAQ_CATEGORY);
    }
}
