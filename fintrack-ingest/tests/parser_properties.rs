//! Property tests for the statement parsers.

use chrono::NaiveDate;
use fintrack_ingest::{Direction, parse_csv, parse_ofx};
use proptest::prelude::*;

fn arb_cents() -> impl Strategy<Value = i64> {
    -10_000_000i64..10_000_000i64
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2035i32, 1u32..13u32, 1u32..29u32)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn fmt_amount(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Which required field a generated OFX block leaves out, if any.
#[derive(Debug, Clone, Copy)]
enum Omit {
    Nothing,
    Amount,
    Date,
    Description,
}

fn arb_omit() -> impl Strategy<Value = Omit> {
    prop_oneof![
        3 => Just(Omit::Nothing),
        1 => Just(Omit::Amount),
        1 => Just(Omit::Date),
        1 => Just(Omit::Description),
    ]
}

fn ofx_block(cents: i64, date: NaiveDate, omit: Omit, use_name: bool) -> String {
    let mut block = String::from("<STMTTRN><TRNTYPE>OTHER\n");
    if !matches!(omit, Omit::Date) {
        block.push_str(&format!("<DTPOSTED>{}120000\n", date.format("%Y%m%d")));
    }
    if !matches!(omit, Omit::Amount) {
        block.push_str(&format!("<TRNAMT>{}\n", fmt_amount(cents)));
    }
    if !matches!(omit, Omit::Description) {
        let tag = if use_name { "NAME" } else { "MEMO" };
        block.push_str(&format!("<{tag}>PAYEE {cents}\n"));
    }
    block.push_str("</STMTTRN>\n");
    block
}

proptest! {
    #[test]
    fn ofx_values_are_never_negative(cents in arb_cents(), date in arb_date()) {
        let text = ofx_block(cents, date, Omit::Nothing, false);
        let txns = parse_ofx(&text).unwrap();
        prop_assert_eq!(txns.len(), 1);
        prop_assert!(txns[0].value >= 0.0);
        let expected = if cents >= 0 { Direction::Income } else { Direction::Expense };
        prop_assert_eq!(txns[0].direction, expected);
        prop_assert_eq!(txns[0].date, date);
    }

    #[test]
    fn ofx_incomplete_blocks_are_dropped_alone(
        blocks in prop::collection::vec((arb_cents(), arb_date(), arb_omit(), any::<bool>()), 0..12)
    ) {
        let text: String = blocks
            .iter()
            .map(|(c, d, o, n)| ofx_block(*c, *d, *o, *n))
            .collect();
        let complete: Vec<_> = blocks
            .iter()
            .filter(|(_, _, o, _)| matches!(o, Omit::Nothing))
            .collect();

        let txns = parse_ofx(&text).unwrap();
        prop_assert_eq!(txns.len(), complete.len());
        for (txn, (cents, date, _, _)) in txns.iter().zip(complete) {
            prop_assert_eq!(txn.date, *date);
            prop_assert!((txn.value - (*cents as f64 / 100.0).abs()).abs() < 1e-9);
        }
    }

    #[test]
    fn csv_values_are_never_negative(
        rows in prop::collection::vec((arb_cents(), arb_date()), 1..20),
        semicolon in any::<bool>(),
    ) {
        let sep = if semicolon { ';' } else { ',' };
        let mut text = format!("Data{sep}Estabelecimento{sep}Valor\n");
        for (i, (cents, date)) in rows.iter().enumerate() {
            let amount = if semicolon { fmt_amount(*cents).replace('.', ",") } else { fmt_amount(*cents) };
            text.push_str(&format!("{}{sep}\"Loja {i}\"{sep}{amount}\n", date.format("%d/%m/%Y")));
        }

        let txns = parse_csv(&text).unwrap();
        prop_assert_eq!(txns.len(), rows.len());
        for (txn, (cents, date)) in txns.iter().zip(&rows) {
            prop_assert!(txn.value >= 0.0);
            prop_assert_eq!(txn.date, *date);
            prop_assert_eq!(txn.direction == Direction::Expense, *cents < 0);
        }
    }
}

#[test]
fn csv_semicolon_portuguese_header_parses() {
    let text = "Data;Valor;Estabelecimento\n10/05/2024;-99,90;Farmacia\n";
    let txns = parse_csv(text).unwrap();
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].description, "Farmacia");
}

#[test]
fn csv_without_recognizable_columns_is_empty() {
    assert!(parse_csv("Foo,Bar\nx,y\n").unwrap().is_empty());
}
