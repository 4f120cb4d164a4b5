//! Card dates
//!
//! Index dates arrive either as ISO dates or as spreadsheet serial day
//! numbers. Cards show them in the page's date locale.

use chrono::{Days, NaiveDate};

/// Day zero of spreadsheet serial dates
fn serial_epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)
}

/// Parse an index date
///
/// Values containing `-` are dates (`YYYY-MM-DD` or `MM-DD-YYYY`); anything
/// else is read as a serial day number, fractional parts ignored.
#[must_use]
pub fn parse_card_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.contains('-') {
        return NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(raw, "%m-%d-%Y"))
            .ok();
    }
    let serial: f64 = raw.parse().ok()?;
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let days = serial.floor() as u64;
    serial_epoch()?.checked_add_days(Days::new(days))
}

/// Format a date for a date locale
#[must_use]
pub fn format_date(date: NaiveDate, date_locale: &str) -> String {
    let pattern = match date_locale {
        "en-US" => "%m-%d-%Y",
        "de" => "%d.%m.%Y",
        "ko" => "%Y. %m. %d.",
        "ja-JP" => "%Y/%m/%d",
        "en-UK" | "fr" | "es" | "it" | "pt-BR" => "%d/%m/%Y",
        _ => "%Y-%m-%d",
    };
    date.format(pattern).to_string()
}

/// Format an index date for a card, the raw value when it cannot be read
#[must_use]
pub fn format_card_date(raw: &str, date_locale: &str) -> String {
    match parse_card_date(raw) {
        Some(date) => format_date(date, date_locale),
        None => {
            tracing::debug!("Unreadable card date: {}", raw);
            raw.to_string()
        }
    }
}
