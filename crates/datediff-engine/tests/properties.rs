use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use datediff_engine::{calculate, CalculationType, DiffError};
use proptest::prelude::*;

// 1971-01-01 .. 2100-01-01, keeps every instant past the epoch cutoff
const MIN_TS: i64 = 31_536_000;
const MAX_TS: i64 = 4_102_444_800;

fn instant(ts: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(ts, 0).single().expect("timestamp in range")
}

fn ordered_pair() -> impl Strategy<Value = (i64, i64)> {
    (MIN_TS..MAX_TS, 0i64..(50 * 366 * 86_400))
        .prop_map(|(start, span)| (start, (start + span).min(MAX_TS)))
}

fn diff(start: &str, end: &str, unit: CalculationType) -> i64 {
    calculate(start, end, unit.as_str()).unwrap().result
}

proptest! {
    #[test]
    fn days_match_elapsed_seconds((a, b) in ordered_pair()) {
        let (start, end) = (instant(a).to_rfc3339(), instant(b).to_rfc3339());
        prop_assert_eq!(diff(&start, &end, CalculationType::Days), (b - a) / 86_400);
        prop_assert_eq!(diff(&start, &end, CalculationType::Seconds), b - a);
    }

    #[test]
    fn coarser_units_are_consistent((a, b) in ordered_pair()) {
        let (start, end) = (instant(a).to_rfc3339(), instant(b).to_rfc3339());
        let days = diff(&start, &end, CalculationType::Days);
        let hours = diff(&start, &end, CalculationType::Hours);
        let minutes = diff(&start, &end, CalculationType::Minutes);
        let seconds = diff(&start, &end, CalculationType::Seconds);

        prop_assert_eq!(diff(&start, &end, CalculationType::Weeks), days / 7);
        prop_assert_eq!(hours, seconds / 3600);
        prop_assert_eq!(minutes, seconds / 60);
        prop_assert!(hours >= days * 24 && hours < (days + 1) * 24);
    }

    #[test]
    fn weekdays_bounded_by_days((a, b) in ordered_pair()) {
        let (start, end) = (instant(a).to_rfc3339(), instant(b).to_rfc3339());
        let days = diff(&start, &end, CalculationType::Days);
        let weekdays = diff(&start, &end, CalculationType::Weekdays);

        prop_assert!(weekdays >= (days / 7) * 5);
        prop_assert!(weekdays <= (days / 7) * 5 + 5);
        prop_assert!(weekdays <= days);
    }

    #[test]
    fn years_bracket_the_calendar((a, b) in ordered_pair()) {
        let (sa, sb) = (instant(a), instant(b));
        let years = diff(&sa.to_rfc3339(), &sb.to_rfc3339(), CalculationType::Years);
        let calendar_span = i64::from(sb.year() - sa.year());

        prop_assert!(years == calendar_span || years == calendar_span - 1);
        prop_assert!(years * 365 <= (b - a) / 86_400);
    }

    #[test]
    fn offset_representation_does_not_change_result(
        (a, b) in ordered_pair(),
        offset_hours in -12i32..=14,
    ) {
        let tz = chrono::FixedOffset::east_opt(offset_hours * 3600).unwrap();
        let end_utc = instant(b).to_rfc3339();
        let end_shifted = instant(b).with_timezone(&tz).to_rfc3339();
        let start = instant(a).to_rfc3339();

        for unit in [CalculationType::Days, CalculationType::Hours, CalculationType::Seconds] {
            prop_assert_eq!(diff(&start, &end_utc, unit), diff(&start, &end_shifted, unit));
        }
    }

    #[test]
    fn reversed_inputs_are_rejected((a, b) in ordered_pair()) {
        prop_assume!(a != b);
        let (start, end) = (instant(b).to_rfc3339(), instant(a).to_rfc3339());
        for unit in CalculationType::ALL {
            prop_assert_eq!(calculate(&start, &end, unit.as_str()), Err(DiffError::EndBeforeStart));
        }
    }

    #[test]
    fn same_instant_is_zero(a in MIN_TS..MAX_TS) {
        let t = instant(a).to_rfc3339();
        for unit in CalculationType::ALL {
            prop_assert_eq!(diff(&t, &t, unit), 0);
        }
    }

    #[test]
    fn unknown_units_are_rejected(unit in "[a-zA-Z_-]{0,12}") {
        prop_assume!(unit.parse::<CalculationType>().is_err());
        let t = "2024-01-01T00:00:00+00:00";
        prop_assert_eq!(calculate(t, t, &unit), Err(DiffError::InvalidCalculationType));
    }
}

#[test]
fn weekdays_over_a_full_year_from_monday() {
    // 2024-01-01 is a Monday; 364 days = 52 full weeks
    let start = instant(1_704_067_200);
    let end = start + Duration::days(364);
    assert_eq!(
        diff(&start.to_rfc3339(), &end.to_rfc3339(), CalculationType::Weekdays),
        260
    );
}
