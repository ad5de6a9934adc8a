//! CSV rendering of leads for spreadsheet hand-off.

use super::{Error, Lead};

const HEADER: [&str; 13] = [
    "id",
    "created_at",
    "status",
    "source",
    "name",
    "email",
    "phone",
    "city",
    "model",
    "consent",
    "message",
    "notes",
    "updated_at",
];

/// Neutralise spreadsheet formula prefixes.
fn cell(text: &str) -> String {
    if text.starts_with(['=', '+', '-', '@']) {
        format!("'{text}")
    } else {
        text.to_owned()
    }
}

/// Render `leads` as RFC 4180 CSV with a header row.
///
/// # Examples
/// ```
/// let csv = site_backend::domain::leads_to_csv(&[]).unwrap();
/// assert!(csv.starts_with("id,created_at,status"));
/// ```
pub fn leads_to_csv(leads: &[Lead]) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let to_internal = |err: csv::Error| Error::internal(format!("failed to write CSV: {err}"));
    writer.write_record(HEADER).map_err(to_internal)?;
    for lead in leads {
        writer
            .write_record([
                lead.id.to_string(),
                lead.created_at.to_rfc3339(),
                lead.status.to_string(),
                lead.source.to_string(),
                cell(lead.name.as_ref()),
                cell(lead.email.as_ref()),
                cell(lead.phone.as_ref()),
                lead.city.as_ref().map(|c| cell(c.as_ref())).unwrap_or_default(),
                lead.model_slug.as_ref().map(ToString::to_string).unwrap_or_default(),
                lead.consent.to_string(),
                lead.message.as_deref().map(cell).unwrap_or_default(),
                lead.notes.as_deref().map(cell).unwrap_or_default(),
                lead.updated_at.to_rfc3339(),
            ])
            .map_err(to_internal)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| Error::internal(format!("failed to flush CSV: {err}")))?;
    String::from_utf8(bytes).map_err(|err| Error::internal(format!("CSV was not UTF-8: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        EmailAddress, LeadId, LeadSource, LeadStatus, PersonName, PhoneNumber,
    };
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn lead(message: Option<&str>) -> Lead {
        let at = Utc
            .with_ymd_and_hms(2025, 5, 1, 8, 0, 0)
            .single()
            .expect("timestamp");
        Lead {
            id: LeadId::generate(),
            name: PersonName::new("Ravi, Jr.").expect("name"),
            email: EmailAddress::new("ravi@example.com").expect("email"),
            phone: PhoneNumber::new("+919876543210").expect("phone"),
            city: None,
            model_slug: None,
            message: message.map(str::to_owned),
            source: LeadSource::ContactPage,
            consent: false,
            status: LeadStatus::New,
            notes: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[rstest]
    fn quotes_commas_and_keeps_one_row_per_lead() {
        let csv = leads_to_csv(&[lead(Some("Call after \"6pm\"")), lead(None)]).expect("csv");
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("\"Ravi, Jr.\""));
        assert!(lines[1].contains("\"Call after \"\"6pm\"\"\""));
        assert!(lines[1].contains(",contact_page,"));
    }

    #[rstest]
    #[case("=HYPERLINK(\"x\")", "'=HYPERLINK")]
    #[case("@SUM(A1)", "'@SUM")]
    fn neutralises_formulas(#[case] message: &str, #[case] expected: &str) {
        let csv = leads_to_csv(&[lead(Some(message))]).expect("csv");
        assert!(csv.contains(expected));
    }

    #[rstest]
    fn phone_numbers_keep_their_plus_sign() {
        let csv = leads_to_csv(&[lead(None)]).expect("csv");
        assert!(csv.contains(",'+919876543210,"));
    }
}
