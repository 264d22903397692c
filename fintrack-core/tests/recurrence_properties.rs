//! Property tests for the recurrence projector.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime};
use fintrack_core::{DateWindow, RecurringExpenseSeed, partition_by_window, project_occurrences};
use proptest::prelude::*;

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2015i32..2026i32, 1u32..13u32, 1u32..32u32).prop_filter_map("valid date", |(y, m, d)| {
        NaiveDate::from_ymd_opt(y, m, d)
    })
}

fn arb_now() -> impl Strategy<Value = NaiveDateTime> {
    (arb_date(), 0u32..24u32).prop_map(|(d, h)| d.and_time(NaiveTime::from_hms_opt(h, 30, 0).unwrap()))
}

fn months_between(a: NaiveDate, b: NaiveDate) -> i32 {
    (b.year() - a.year()) * 12 + b.month() as i32 - a.month() as i32
}

proptest! {
    #[test]
    fn occurrences_never_pass_now(anchor in arb_date(), now in arb_now()) {
        let seed = RecurringExpenseSeed::new("e", anchor);
        let out = project_occurrences(&seed, now);

        prop_assert!(out.iter().all(|o| o.occurrence_date <= now.date()));
        prop_assert!(out.iter().all(|o| o.occurrence_date > anchor));
        if anchor <= now.date() {
            // one per elapsed month, give or take the current one
            let elapsed = months_between(anchor, now.date()).max(0) as usize;
            prop_assert!(out.len() == elapsed || out.len() + 1 == elapsed);
        } else {
            prop_assert!(out.is_empty());
        }
    }

    #[test]
    fn occurrences_step_one_month_from_anchor(anchor in arb_date(), now in arb_now()) {
        let seed = RecurringExpenseSeed::new("e", anchor);
        let out = project_occurrences(&seed, now);

        for (i, o) in out.iter().enumerate() {
            let expected = anchor.checked_add_months(Months::new(i as u32 + 1)).unwrap();
            prop_assert_eq!(o.occurrence_date, expected);
        }
        for pair in out.windows(2) {
            prop_assert!(pair[0].occurrence_date < pair[1].occurrence_date);
            prop_assert_eq!(months_between(pair[0].occurrence_date, pair[1].occurrence_date), 1);
        }
    }

    #[test]
    fn cancellation_bounds_the_series(anchor in arb_date(), cancel in arb_date(), now in arb_now()) {
        let open = project_occurrences(&RecurringExpenseSeed::new("e", anchor), now);
        let closed = project_occurrences(&RecurringExpenseSeed::new("e", anchor).cancelled_on(cancel), now);

        prop_assert!(closed.iter().all(|o| o.occurrence_date <= cancel));
        let expected: Vec<_> = open.into_iter().filter(|o| o.occurrence_date <= cancel).collect();
        prop_assert_eq!(closed, expected);
    }

    #[test]
    fn window_split_is_exclusive(anchor in arb_date(), now in arb_now(), start in arb_date(), span in 0i64..400) {
        let seed = RecurringExpenseSeed::new("e", anchor);
        let window = DateWindow::new(start, start + chrono::Duration::days(span));
        let split = partition_by_window(&seed, now, window);

        prop_assert!(split.before.iter().all(|o| o.occurrence_date < window.start));
        prop_assert!(split.within.iter().all(|o| window.contains(o.occurrence_date)));

        let all = project_occurrences(&seed, now);
        let expected = all.iter().filter(|o| o.occurrence_date <= window.end).count();
        prop_assert_eq!(split.before.len() + split.within.len(), expected);
    }
}

#[test]
fn cancellation_on_occurrence_day_keeps_it() {
    let anchor = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    let now = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap().and_hms_opt(8, 0, 0).unwrap();

    let on_day = RecurringExpenseSeed::new("e", anchor).cancelled_on(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
    assert_eq!(project_occurrences(&on_day, now).len(), 1);

    let day_before = RecurringExpenseSeed::new("e", anchor).cancelled_on(NaiveDate::from_ymd_opt(2024, 2, 9).unwrap());
    assert!(project_occurrences(&day_before, now).is_empty());
}
