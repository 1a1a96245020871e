// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{LedgerError, LedgerResult};
use anyhow::Result;
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, Timelike};
use comfy_table::{presets::UTF8_FULL, Cell, Table};

const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

pub const CURRENCY_PREFIX: &str = "Rp\u{a0}";

pub fn parse_date(s: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| LedgerError::InvalidDate(s.to_string()))
}

/// Resolve a stored date value to a local wall-clock instant.
/// Plain `YYYY-MM-DD` values resolve to local midnight of that day; values
/// carrying an offset are converted into the local zone.
pub fn parse_date_like(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    None
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// `Rp 1.234.567`, negative values as `-Rp 1.234.567`.
pub fn fmt_idr(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    format!("{}{}{}", sign, CURRENCY_PREFIX, group_thousands(amount.unsigned_abs()))
}

/// Same as [`fmt_idr`] without the currency prefix.
pub fn fmt_amount(amount: i64) -> String {
    fmt_idr(amount).replacen(CURRENCY_PREFIX, "", 1)
}

pub fn fmt_date_short(d: NaiveDate) -> String {
    format!("{} {} {}", d.day(), MONTHS_SHORT[d.month0() as usize], d.year())
}

/// Two-digit day plus short month, e.g. `05 Mar`.
pub fn fmt_day_month(d: NaiveDate) -> String {
    format!("{:02} {}", d.day(), MONTHS_SHORT[d.month0() as usize])
}

pub fn fmt_period_label(from: NaiveDate, to: NaiveDate) -> String {
    format!("{} \u{2013} {}", fmt_day_month(from), fmt_day_month(to))
}

pub fn fmt_export_timestamp(dt: NaiveDateTime) -> String {
    format!(
        "{}/{}/{}, {:02}.{:02}.{:02}",
        dt.day(),
        dt.month(),
        dt.year(),
        dt.hour(),
        dt.minute(),
        dt.second()
    )
}

pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idr_groups_thousands_with_dots() {
        assert_eq!(fmt_idr(0), "Rp\u{a0}0");
        assert_eq!(fmt_idr(999), "Rp\u{a0}999");
        assert_eq!(fmt_idr(1000), "Rp\u{a0}1.000");
        assert_eq!(fmt_idr(1_234_567), "Rp\u{a0}1.234.567");
        assert_eq!(fmt_idr(-60_000), "-Rp\u{a0}60.000");
        assert_eq!(fmt_amount(-60_000), "-60.000");
        assert_eq!(fmt_amount(100_000), "100.000");
    }

    #[test]
    fn short_dates_use_indonesian_months() {
        let d = NaiveDate::from_ymd_opt(2024, 5, 7).unwrap();
        assert_eq!(fmt_date_short(d), "7 Mei 2024");
        assert_eq!(fmt_day_month(d), "07 Mei");
        let to = NaiveDate::from_ymd_opt(2024, 8, 31).unwrap();
        assert_eq!(fmt_period_label(d, to), "07 Mei \u{2013} 31 Agu");
    }

    #[test]
    fn export_timestamp_uses_dotted_time() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(9, 4, 3)
            .unwrap();
        assert_eq!(fmt_export_timestamp(dt), "5/3/2024, 09.04.03");
    }

    #[test]
    fn date_like_values_resolve() {
        let midnight = parse_date_like("2024-03-05").unwrap();
        assert_eq!(midnight.to_string(), "2024-03-05 00:00:00");
        let naive = parse_date_like("2024-03-05T10:30:00").unwrap();
        assert_eq!(naive.to_string(), "2024-03-05 10:30:00");
        assert!(parse_date_like("2024-03-05T10:30:00.000Z").is_some());
        assert!(parse_date_like("05/03/2024").is_none());
        assert!(parse_date_like("").is_none());
    }

    #[test]
    fn html_is_escaped() {
        assert_eq!(html_escape("<b>\"A&B\"</b>"), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
    }
}
