//! Generic bank CSV parser
//!
//! Layouts vary per bank and per language, so nothing about the file is
//! assumed beyond a header row:
//!   Data;Estabelecimento;Valor
//!   15/01/2024;"Mercado";-45,90
//!
//! The delimiter is guessed from the header and the date/description/value
//! columns are found by keyword. Quotes carry no meaning when splitting;
//! they are stripped from each cell afterwards.

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

use crate::error::Result;
use crate::normalize::{parse_lenient_amount, strip_quotes, transaction};
use crate::types::Transaction;

const DATE_KEYWORDS: &[&str] = &["data", "date"];
const DESCRIPTION_KEYWORDS: &[&str] = &["desc", "memo", "nome", "estabelecimento"];
const VALUE_KEYWORDS: &[&str] = &["valor", "amount", "value"];

/// Positions of the three columns every import needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub date: usize,
    pub description: usize,
    pub value: usize,
}

impl ColumnLayout {
    /// Locate columns in lower-cased header cells. The first header holding
    /// any keyword of a set wins.
    pub fn detect<S: AsRef<str>>(headers: &[S]) -> Option<Self> {
        Some(Self {
            date: find_column(headers, DATE_KEYWORDS)?,
            description: find_column(headers, DESCRIPTION_KEYWORDS)?,
            value: find_column(headers, VALUE_KEYWORDS)?,
        })
    }

    fn widest(&self) -> usize {
        self.date.max(self.description).max(self.value)
    }
}

fn find_column<S: AsRef<str>>(headers: &[S], keywords: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| keywords.iter().any(|k| h.as_ref().contains(k)))
}

/// `;` when the header has one, otherwise `,`.
pub fn detect_delimiter(header_line: &str) -> u8 {
    if header_line.contains(';') { b';' } else { b',' }
}

fn leading_int(s: &str) -> Option<u32> {
    let s = s.trim();
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(s.len(), |(i, _)| i);
    s[..end].parse().ok()
}

/// Accepts `YYYY/MM/DD`, `DD/MM/YYYY` and ISO `YYYY-MM-DD`; the shape is
/// chosen by the presence of `/` and the width of the first segment.
pub fn parse_statement_date(raw: &str) -> Option<NaiveDate> {
    let raw = strip_quotes(raw);

    if raw.contains('/') {
        let parts: Vec<&str> = raw.split('/').map(str::trim).collect();
        if parts.len() < 3 {
            return None;
        }
        let year_first = parts[0].len() == 4 && parts[0].chars().all(|c| c.is_ascii_digit());
        let (y, m, d) = if year_first {
            (parts[0], parts[1], parts[2])
        } else {
            (parts[2], parts[1], parts[0])
        };
        let year = i32::try_from(leading_int(y)?).ok()?;
        NaiveDate::from_ymd_opt(year, leading_int(m)?, leading_int(d)?)
    } else {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }
}

fn split_line(builder: &ReaderBuilder, line: &str) -> Option<StringRecord> {
    let mut rdr = builder.from_reader(line.as_bytes());
    let mut record = StringRecord::new();
    match rdr.read_record(&mut record) {
        Ok(true) => Some(record),
        _ => None,
    }
}

fn parse_row(layout: &ColumnLayout, record: &StringRecord) -> Option<Transaction> {
    if record.len() <= layout.widest() {
        return None;
    }

    let description = strip_quotes(record.get(layout.description)?);
    let amount = parse_lenient_amount(record.get(layout.value)?)?;
    let date = parse_statement_date(record.get(layout.date)?)?;

    Some(transaction(date, description, amount))
}

/// Parse bank CSV text into transactions, in row order.
///
/// Returns an empty list when there is no data row or when any of the
/// date/description/value columns cannot be identified. Rows with too few
/// cells, an unreadable value or an unreadable date are skipped.
pub fn parse_csv(content: &str) -> Result<Vec<Transaction>> {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let Some((header_line, rows)) = lines.split_first() else {
        return Ok(Vec::new());
    };
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder = ReaderBuilder::new();
    builder
        .delimiter(detect_delimiter(header_line))
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All);

    let headers: Vec<String> = split_line(&builder, &header_line.to_lowercase())
        .map(|r| r.iter().map(str::to_string).collect())
        .unwrap_or_default();

    let Some(layout) = ColumnLayout::detect(&headers) else {
        warn!(?headers, "could not identify date/description/value columns");
        return Ok(Vec::new());
    };

    let mut out = Vec::with_capacity(rows.len());
    for (index, line) in rows.iter().enumerate() {
        match split_line(&builder, line).and_then(|r| parse_row(&layout, &r)) {
            Some(txn) => out.push(txn),
            None => debug!(row = index + 1, "skipping unreadable CSV row"),
        }
    }

    Ok(out)
}
