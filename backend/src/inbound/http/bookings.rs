//! Public test-ride booking.

use actix_web::{HttpResponse, post, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::validation::optional_text;
use crate::domain::{
    BOOKING_NOTES_MAX, BookingId, City, DealerId, EmailAddress, Error, NewBooking, PersonName,
    PhoneNumber, PreferredDate, Slug, TimeSlot, ValidationReport,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::leads::non_blank;
use crate::inbound::http::schemas::CreatedResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_label;

/// Test-ride form body.
#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct BookingRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    #[schema(example = "volt-s1")]
    pub model_slug: Option<String>,
    #[schema(example = "2025-03-14")]
    pub preferred_date: Option<String>,
    #[schema(example = "morning")]
    pub time_slot: Option<String>,
    #[schema(format = Uuid)]
    pub dealer_id: Option<String>,
    pub notes: Option<String>,
}

impl BookingRequest {
    /// Validate every field against the booking window starting `today`.
    pub fn into_new_booking(self, today: NaiveDate) -> Result<NewBooking, Error> {
        let mut report = ValidationReport::default();
        let name = report.check("name", PersonName::new(self.name.unwrap_or_default()));
        let email = report.check("email", EmailAddress::new(self.email.unwrap_or_default()));
        let phone = report.check("phone", PhoneNumber::new(self.phone.unwrap_or_default()));
        let city = report.check("city", City::new(self.city.unwrap_or_default()));
        let model_slug = report.check("modelSlug", Slug::new(self.model_slug.unwrap_or_default()));
        let preferred_date = match non_blank(self.preferred_date) {
            Some(raw) => report.check("preferredDate", PreferredDate::parse(&raw, today)),
            None => {
                report.push("preferredDate", "required", "preferredDate is required");
                None
            }
        };
        let time_slot = match parse_label::<TimeSlot>(&mut report, "timeSlot", self.time_slot.as_deref()) {
            Some(None) => {
                report.push("timeSlot", "required", "timeSlot is required");
                None
            }
            other => other.flatten(),
        };
        let dealer_id = match non_blank(self.dealer_id) {
            Some(raw) => match raw.trim().parse::<DealerId>() {
                Ok(id) => Some(Some(id)),
                Err(_) => {
                    report.push("dealerId", "invalid_uuid", "dealerId must be a valid UUID");
                    None
                }
            },
            None => Some(None),
        };
        let notes = optional_text(&mut report, "notes", self.notes, BOOKING_NOTES_MAX);

        match (name, email, phone, city, model_slug, preferred_date, time_slot, dealer_id) {
            (
                Some(name),
                Some(email),
                Some(phone),
                Some(city),
                Some(model_slug),
                Some(preferred_date),
                Some(time_slot),
                Some(dealer_id),
            ) if report.is_clean() => Ok(NewBooking {
                id: BookingId::generate(),
                name,
                email,
                phone,
                city,
                model_slug,
                preferred_date,
                time_slot,
                dealer_id,
                notes,
            }),
            _ => Err(report.into_error()),
        }
    }
}

/// Book a test ride.
#[utoipa::path(
    post,
    path = "/api/bookings",
    request_body = BookingRequest,
    responses(
        (status = 201, description = "Booking stored", body = CreatedResponse),
        (status = 400, description = "Validation failed; see details.fields", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "createBooking",
    security([])
)]
#[post("/bookings")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    payload: web::Json<BookingRequest>,
) -> ApiResult<HttpResponse> {
    let booking = payload.into_inner().into_new_booking(state.bookings.today())?;
    let id = state.bookings.submit(booking).await?;
    Ok(HttpResponse::Created().json(CreatedResponse { id: *id.as_uuid() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::test_state;
    use crate::inbound::http::validation::json_config;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use chrono::{Days, Utc};
    use rstest::{fixture, rstest};
    use serde_json::Value;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).expect("date")
    }

    #[fixture]
    fn valid() -> BookingRequest {
        BookingRequest {
            name: Some("Asha Rao".into()),
            email: Some("asha@example.com".into()),
            phone: Some("9876543210".into()),
            city: Some("Pune".into()),
            model_slug: Some("volt-s1".into()),
            preferred_date: Some("2025-03-10".into()),
            time_slot: Some("afternoon".into()),
            dealer_id: None,
            notes: None,
        }
    }

    fn fields(error: &Error) -> Vec<(String, String)> {
        error
            .details()
            .and_then(|d| d.get("fields"))
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|f| {
                        (
                            f["field"].as_str().unwrap_or_default().to_owned(),
                            f["code"].as_str().unwrap_or_default().to_owned(),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    #[rstest]
    fn known_good_booking_is_accepted(valid: BookingRequest) {
        let booking = valid.into_new_booking(today()).expect("valid booking");
        assert_eq!(booking.time_slot, TimeSlot::Afternoon);
        assert_eq!(
            booking.preferred_date.date(),
            NaiveDate::from_ymd_opt(2025, 3, 10).expect("date")
        );
    }

    #[rstest]
    #[case::today("2025-03-01", None)]
    #[case::horizon("2025-05-30", None)]
    #[case::yesterday("2025-02-28", Some("date_in_past"))]
    #[case::beyond_horizon("2025-05-31", Some("date_too_far"))]
    #[case::not_a_date("14/03/2025", Some("invalid_date"))]
    fn preferred_date_window(#[case] raw: &str, #[case] code: Option<&str>) {
        let request = BookingRequest {
            preferred_date: Some(raw.into()),
            ..valid()
        };
        match (request.into_new_booking(today()), code) {
            (Ok(_), None) => {}
            (Err(err), Some(code)) => {
                assert_eq!(fields(&err), vec![("preferredDate".to_owned(), code.to_owned())]);
            }
            (outcome, expected) => panic!("unexpected {outcome:?} for {expected:?}"),
        }
    }

    #[rstest]
    fn missing_fields_are_all_reported() {
        let err = BookingRequest::default()
            .into_new_booking(today())
            .expect_err("invalid");
        let names: Vec<String> = fields(&err).into_iter().map(|(field, _)| field).collect();
        assert_eq!(
            names,
            vec!["name", "email", "phone", "city", "modelSlug", "preferredDate", "timeSlot"]
        );
    }

    #[rstest]
    #[case::slot(BookingRequest { time_slot: Some("midnight".into()), ..valid() }, "timeSlot", "invalid_option")]
    #[case::dealer(BookingRequest { dealer_id: Some("dealer-7".into()), ..valid() }, "dealerId", "invalid_uuid")]
    #[case::notes(BookingRequest { notes: Some("n".repeat(BOOKING_NOTES_MAX + 1)), ..valid() }, "notes", "too_long")]
    fn known_bad_bookings_are_rejected(
        #[case] request: BookingRequest,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let err = request.into_new_booking(today()).expect_err("invalid");
        assert_eq!(fields(&err), vec![(field.to_owned(), code.to_owned())]);
    }

    #[actix_web::test]
    async fn booking_endpoint_uses_the_current_date() {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .app_data(json_config())
                .service(web::scope("/api").service(create_booking)),
        )
        .await;
        let tomorrow = Utc::now()
            .date_naive()
            .checked_add_days(Days::new(1))
            .expect("date");
        let request = BookingRequest {
            preferred_date: Some(tomorrow.format("%Y-%m-%d").to_string()),
            ..valid()
        };
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/bookings")
                .set_json(request)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }
}
