//! Cross-checks the generator against the `rrule` crate for rules both can express.

use almanac_test::component::settings::WeekStart;
use almanac_test::component::{ExpansionOptions, RecurrenceSpec, weekday};
use almanac_test::fixtures::start_timestamps;
use rrule::RRuleSet;

use super::helpers::{at, expand_with, nine_am, window};

pub struct OracleCase {
    pub name: &'static str,
    pub rruleset: &'static str,
    pub spec: RecurrenceSpec,
    pub week_start: WeekStart,
    pub limit: u16,
}

fn case(name: &'static str, rruleset: &'static str, spec: RecurrenceSpec) -> OracleCase {
    OracleCase {
        name,
        rruleset,
        spec,
        week_start: WeekStart::Monday,
        limit: 500,
    }
}

fn oracle_cases() -> Vec<OracleCase> {
    vec![
        case(
            "daily_interval",
            "DTSTART:20240130T090000Z\nRRULE:FREQ=DAILY;INTERVAL=3;COUNT=8",
            RecurrenceSpec::daily(nine_am(2024, 1, 30), 3).with_count(8),
        ),
        case(
            "daily_until",
            "DTSTART:20240101T083000Z\nRRULE:FREQ=DAILY;UNTIL=20240110T083000Z",
            RecurrenceSpec::daily(at(2024, 1, 1, 8, 30), 1).with_until(at(2024, 1, 10, 8, 30)),
        ),
        case(
            "weekly_mon_wed_fri",
            "DTSTART:20240101T090000Z\nRRULE:FREQ=WEEKLY;BYDAY=MO,WE,FR;COUNT=14",
            RecurrenceSpec::weekly(
                nine_am(2024, 1, 1),
                1,
                weekday::MONDAY | weekday::WEDNESDAY | weekday::FRIDAY,
            )
            .with_count(14),
        ),
        case(
            "weekly_every_other_tue_thu",
            "DTSTART:20240102T090000Z\nRRULE:FREQ=WEEKLY;INTERVAL=2;WKST=MO;BYDAY=TU,TH;COUNT=10",
            RecurrenceSpec::weekly(
                nine_am(2024, 1, 2),
                2,
                weekday::TUESDAY | weekday::THURSDAY,
            )
            .with_count(10),
        ),
        OracleCase {
            week_start: WeekStart::Sunday,
            ..case(
                "weekly_weekend_sunday_start",
                "DTSTART:20240106T090000Z\nRRULE:FREQ=WEEKLY;INTERVAL=2;WKST=SU;BYDAY=SA,SU;COUNT=8",
                RecurrenceSpec::weekly(nine_am(2024, 1, 6), 2, weekday::WEEKEND).with_count(8),
            )
        },
        case(
            "monthly_day",
            "DTSTART:20240115T090000Z\nRRULE:FREQ=MONTHLY;INTERVAL=2;BYMONTHDAY=15;COUNT=6",
            RecurrenceSpec::monthly(nine_am(2024, 1, 15), 2, 15).with_count(6),
        ),
        case(
            "monthly_second_tuesday",
            "DTSTART:20240109T100000Z\nRRULE:FREQ=MONTHLY;BYDAY=2TU;COUNT=6",
            RecurrenceSpec::monthly_nth(at(2024, 1, 9, 10, 0), 1, weekday::TUESDAY, 2)
                .with_count(6),
        ),
        case(
            "monthly_last_friday",
            "DTSTART:20240126T100000Z\nRRULE:FREQ=MONTHLY;BYDAY=-1FR;COUNT=12",
            RecurrenceSpec::monthly_nth(at(2024, 1, 26, 10, 0), 1, weekday::FRIDAY, 5)
                .with_count(12),
        ),
        case(
            "yearly_day",
            "DTSTART:20240315T090000Z\nRRULE:FREQ=YEARLY;BYMONTH=3;BYMONTHDAY=15;COUNT=4",
            RecurrenceSpec::yearly(nine_am(2024, 3, 15), 1, 3, 15).with_count(4),
        ),
        case(
            "yearly_fourth_thursday",
            "DTSTART:20241128T170000Z\nRRULE:FREQ=YEARLY;BYMONTH=11;BYDAY=4TH;COUNT=5",
            RecurrenceSpec::yearly_nth(at(2024, 11, 28, 17, 0), 1, 11, weekday::THURSDAY, 4)
                .with_count(5),
        ),
    ]
}

fn oracle_timestamps(case: &OracleCase) -> Vec<i64> {
    let rrule_set: RRuleSet = case
        .rruleset
        .parse()
        .unwrap_or_else(|err| panic!("Failed to parse {}: {}", case.name, err));

    rrule_set
        .all(case.limit)
        .dates
        .iter()
        .map(chrono::DateTime::timestamp)
        .collect()
}

/// ## Summary
/// Full series expansion agrees with `rrule` for every shared case.
#[test_log::test]
fn series_match_rrule() {
    for case in oracle_cases() {
        let options = ExpansionOptions::default().week_start(case.week_start);
        let ours = start_timestamps(&expand_with(&case.spec, &options).occurrences);

        assert_eq!(ours, oracle_timestamps(&case), "Case {} did not match", case.name);
    }
}

/// ## Summary
/// A window far into a long series selects the same starts `rrule` lists there.
#[test_log::test]
fn windowed_series_match_rrule() {
    let cases = [
        case(
            "daily_long",
            "DTSTART:20240101T090000Z\nRRULE:FREQ=DAILY;INTERVAL=5;COUNT=400",
            RecurrenceSpec::daily(nine_am(2024, 1, 1), 5).with_count(400),
        ),
        case(
            "weekly_long",
            "DTSTART:20240103T090000Z\nRRULE:FREQ=WEEKLY;INTERVAL=3;BYDAY=MO,WE,SA;COUNT=450",
            RecurrenceSpec::weekly(
                nine_am(2024, 1, 3),
                3,
                weekday::MONDAY | weekday::WEDNESDAY | weekday::SATURDAY,
            )
            .with_count(450),
        ),
    ];
    let from = at(2027, 2, 1, 0, 0);
    let to = at(2027, 5, 1, 0, 0);

    for case in cases {
        let expected: Vec<i64> = oracle_timestamps(&case)
            .into_iter()
            .filter(|ts| (from.timestamp()..to.timestamp()).contains(ts))
            .collect();
        let ours = start_timestamps(&expand_with(&case.spec, &window(from, to)).occurrences);

        assert!(!expected.is_empty(), "Case {} has no oracle dates", case.name);
        assert_eq!(ours, expected, "Case {} did not match", case.name);
    }
}
