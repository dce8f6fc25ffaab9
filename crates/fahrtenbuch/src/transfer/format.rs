//! CSV document layout shared by export and import.
//!
//! Rows look like `15.1.2024,1000,"Main St","Client visit"`: a German
//! date-only rendering of the timestamp, the mileage, then address and
//! purpose, always quoted. Embedded quotes are doubled.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};
use tracing::warn;

use crate::entry::Entry;

/// Header row of every exported document.
pub const CSV_HEADER: &str = "Datum,Kilometerstand,Standort,Zweck";

/// Number of fields per data row.
pub const FIELD_COUNT: usize = 4;

/// Date rendering used on export (`d.m.yyyy`, no zero padding).
const EXPORT_DATE_FORMAT: &str = "%-d.%-m.%Y";

/// Date-only forms accepted on import.
const IMPORT_DATE_FORMATS: &[&str] = &["%d.%m.%Y", "%Y-%m-%d"];

/// Render a complete CSV document, dating rows in `zone`.
///
/// Rows are separated by `\n`; there is no trailing newline.
#[must_use]
pub fn render<Tz: TimeZone>(entries: &[Entry], zone: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    let rows: Vec<String> = entries.iter().map(|e| render_row(e, zone)).collect();
    format!("{CSV_HEADER}\n{}", rows.join("\n"))
}

/// Render one data row.
#[must_use]
pub fn render_row<Tz: TimeZone>(entry: &Entry, zone: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    format!(
        "{},{},{},{}",
        quote_if_needed(&export_date(&entry.timestamp, zone)),
        quote_if_needed(&entry.mileage),
        quote(&entry.location.address),
        quote(&entry.purpose)
    )
}

/// The calendar date of an ISO timestamp in `zone`, as `d.m.yyyy`.
///
/// Timestamps that don't parse are passed through unchanged.
#[must_use]
pub fn export_date<Tz: TimeZone>(timestamp: &str, zone: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt
            .with_timezone(zone)
            .format(EXPORT_DATE_FORMAT)
            .to_string(),
        Err(e) => {
            warn!("Exporting unparseable timestamp '{}' verbatim: {}", timestamp, e);
            timestamp.to_string()
        }
    }
}

/// Turn an imported date field into a stored ISO timestamp.
///
/// Date-only values land on local midnight. A full RFC 3339 timestamp keeps
/// its instant. Returns `None` for anything else.
#[must_use]
pub fn import_timestamp(field: &str) -> Option<String> {
    let field = field.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(field) {
        return Some(to_iso(dt.with_timezone(&Utc)));
    }

    let date = IMPORT_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(field, format).ok())?;
    let midnight = date.and_time(NaiveTime::MIN);
    let instant = Local
        .from_local_datetime(&midnight)
        .earliest()
        .map_or_else(|| midnight.and_utc(), |dt| dt.with_timezone(&Utc));
    Some(to_iso(instant))
}

fn to_iso(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn quote_if_needed(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(quote(field))
    } else {
        Cow::Borrowed(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Location;
    use chrono::FixedOffset;

    fn entry(timestamp: &str, mileage: &str, address: &str, purpose: &str) -> Entry {
        Entry {
            id: "1".to_string(),
            timestamp: timestamp.to_string(),
            mileage: mileage.to_string(),
            location: Location::from_address(address),
            photo_uri: String::new(),
            purpose: purpose.to_string(),
        }
    }

    #[test]
    fn test_render_row_shape() {
        let row = render_row(&entry("2024-01-15T10:00:00Z", "1000", "A", "P"), &Utc);
        assert_eq!(row, r#"15.1.2024,1000,"A","P""#);
    }

    #[test]
    fn test_render_document() {
        let doc = render(
            &[
                entry("2024-01-15T10:00:00Z", "1000", "A", "P"),
                entry("2024-11-03T12:00:00.000Z", "1250", "B", "Q"),
            ],
            &Utc,
        );
        let lines: Vec<&str> = doc.split('\n').collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], r#"15.1.2024,1000,"A","P""#);
        assert_eq!(lines[2], r#"3.11.2024,1250,"B","Q""#);
        assert!(!doc.ends_with('\n'));
    }

    #[test]
    fn test_render_empty_collection() {
        assert_eq!(render(&[], &Utc), format!("{CSV_HEADER}\n"));
    }

    #[test]
    fn test_quotes_and_commas_are_escaped() {
        let row = render_row(
            &entry(
                "2024-01-15T10:00:00Z",
                "1,5",
                "Hauptstr. 1, Köln",
                r#"Pick up "parts""#,
            ),
            &Utc,
        );
        assert_eq!(
            row,
            r#"15.1.2024,"1,5","Hauptstr. 1, Köln","Pick up ""parts""""#
        );
    }

    #[test]
    fn test_export_date_uses_given_zone() {
        let ts = "2024-01-15T23:30:00Z";
        let east = FixedOffset::east_opt(2 * 3600).unwrap();
        let west = FixedOffset::west_opt(11 * 3600).unwrap();

        assert_eq!(export_date(ts, &Utc), "15.1.2024");
        assert_eq!(export_date(ts, &east), "16.1.2024");
        assert_eq!(export_date("2024-01-15T10:00:00Z", &west), "14.1.2024");
    }

    #[test]
    fn test_export_date_passes_through_garbage() {
        assert_eq!(export_date("yesterday", &Utc), "yesterday");
    }

    #[test]
    fn test_import_timestamp_german_date_is_local_midnight() {
        for field in ["01.01.2024", "1.1.2024", " 1.1.2024 ", "2024-01-01"] {
            let ts = import_timestamp(field).unwrap_or_else(|| panic!("{field} rejected"));
            let local = DateTime::parse_from_rfc3339(&ts)
                .unwrap()
                .with_timezone(&Local);
            assert_eq!(local.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
            assert_eq!(local.time(), NaiveTime::MIN);
            assert!(ts.ends_with('Z'));
        }
    }

    #[test]
    fn test_import_timestamp_keeps_rfc3339_instant() {
        assert_eq!(
            import_timestamp("2024-01-15T10:00:00+01:00").as_deref(),
            Some("2024-01-15T09:00:00.000Z")
        );
    }

    #[test]
    fn test_import_timestamp_rejects_garbage() {
        assert!(import_timestamp("").is_none());
        assert!(import_timestamp("gestern").is_none());
        assert!(import_timestamp("32.13.2024").is_none());
    }

    #[test]
    fn test_export_then_import_date_is_stable() {
        let exported = export_date("2024-06-30T23:59:59Z", &Local);
        let imported = import_timestamp(&exported).unwrap();
        assert_eq!(export_date(&imported, &Local), exported);
    }
}
