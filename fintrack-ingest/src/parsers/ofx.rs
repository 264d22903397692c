//! OFX statement parser (tolerant, tag-soup)
//!
//! Bank exports are SGML-flavoured and frequently omit closing tags, so the
//! file is split on the opening `<STMTTRN>` tag only and each block is
//! mined with patterns:
//!   <STMTTRN><TRNTYPE>DEBIT<DTPOSTED>20240115120000[-3:BRT]
//!   <TRNAMT>-45.90<FITID>0001<MEMO>SUPERMARKET</STMTTRN>

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use crate::error::Result;
use crate::normalize::{parse_lenient_amount, transaction};
use crate::types::Transaction;

const BLOCK_TAG: &str = "<STMTTRN>";

struct OfxPatterns {
    amount: Regex,
    posted: Regex,
    memo: Regex,
    name: Regex,
}

impl OfxPatterns {
    fn compile() -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            amount: Regex::new(r"<TRNAMT>\s*([+-]?(?:\d+(?:[.,]\d*)?|[.,]\d+))")?,
            posted: Regex::new(r"<DTPOSTED>\s*(\d{8})")?,
            memo: Regex::new(r"<MEMO>([^<]+)")?,
            name: Regex::new(r"<NAME>([^<]+)")?,
        })
    }
}

static PATTERNS: LazyLock<std::result::Result<OfxPatterns, regex::Error>> =
    LazyLock::new(OfxPatterns::compile);

fn parse_yyyymmdd(s: &str) -> Option<NaiveDate> {
    let year: i32 = s.get(0..4)?.parse().ok()?;
    let month: u32 = s.get(4..6)?.parse().ok()?;
    let day: u32 = s.get(6..8)?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn first_capture<'a>(re: &Regex, block: &'a str) -> Option<&'a str> {
    re.captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
}

fn parse_block(patterns: &OfxPatterns, block: &str) -> Option<Transaction> {
    let amount = first_capture(&patterns.amount, block).and_then(parse_lenient_amount)?;
    let date = first_capture(&patterns.posted, block).and_then(parse_yyyymmdd)?;
    let description = first_capture(&patterns.memo, block)
        .or_else(|| first_capture(&patterns.name, block))?;

    Some(transaction(date, description, amount))
}

/// Parse OFX text into transactions, in file order.
///
/// Blocks lacking an amount, a posted date, or both MEMO and NAME are
/// dropped; they never affect their siblings. An `Err` only means the
/// extraction patterns themselves failed to build.
pub fn parse_ofx(content: &str) -> Result<Vec<Transaction>> {
    let patterns = (*PATTERNS).as_ref().map_err(Clone::clone)?;

    let mut out = Vec::new();
    for (index, block) in content.split(BLOCK_TAG).skip(1).enumerate() {
        match parse_block(patterns, block) {
            Some(txn) => out.push(txn),
            None => debug!(block = index, "skipping incomplete STMTTRN block"),
        }
    }

    Ok(out)
}
