//! Configuration, request loading, expansion and output wired together.

use almanac_test::component::normalize::day_of;
use almanac_test::component::request::{RuleRequest, write_json_lines};
use almanac_test::component::settings::{Settings, WeekStart};
use almanac_test::component::{ExpansionOptions, RecurrenceSpec, ZoneRegistry, weekday};
use almanac_test::fixtures::start_dates;
use chrono_tz::Tz;
use config::FileFormat;

use super::helpers::{at, date, expand_with, nine_am, window};

fn january_2024() -> Vec<chrono::NaiveDate> {
    [1, 3, 5, 8, 10, 12, 15, 17, 19, 22, 24, 26, 29, 31]
        .into_iter()
        .map(|day| date(2024, 1, day))
        .collect()
}

#[test_log::test]
fn mon_wed_fri_over_january() {
    let spec = RecurrenceSpec::weekly(
        nine_am(2024, 1, 1),
        1,
        weekday::MONDAY | weekday::WEDNESDAY | weekday::FRIDAY,
    );
    let expansion = expand_with(&spec, &window(at(2024, 1, 1, 0, 0), at(2024, 2, 1, 0, 0)));

    assert_eq!(start_dates(&expansion.occurrences), january_2024());
    assert_eq!(
        expansion.occurrences.positions(),
        (1..=14).collect::<Vec<u32>>()
    );
}

#[test_log::test]
fn request_file_to_json_lines() {
    let request = RuleRequest::parse(
        r#"
        [rule]
        type = "weekly"
        interval = 1
        weekday_mask = 42
        start = "2024-01-01T09:00:00Z"
        end = "2024-01-01T10:00:00Z"

        [window]
        start = "2024-01-01T00:00:00Z"
        end = "2024-02-01T00:00:00Z"
        "#,
        FileFormat::Toml,
    )
    .expect("request parses");

    let expansion = request
        .run(ExpansionOptions::default())
        .expect("request expands");
    assert_eq!(start_dates(&expansion.occurrences), january_2024());

    let mut buffer = Vec::new();
    let written = write_json_lines(&mut buffer, &expansion.occurrences).expect("output written");
    assert_eq!(written, 14);

    let text = String::from_utf8(buffer).expect("utf-8 output");
    let first: serde_json::Value =
        serde_json::from_str(text.lines().next().expect("first line")).expect("json line");
    assert_eq!(first["start"], "2024-01-01T09:00:00Z");
    assert_eq!(first["end"], "2024-01-01T10:00:00Z");
    assert_eq!(first["position"], 1);
}

#[test_log::test]
fn settings_drive_zone_and_week_start() {
    let settings = Settings::from_toml_str(
        r#"
        [expansion]
        zone = "office"
        week_start = "sunday"

        [zones.aliases]
        office = "Europe/Berlin"
        "#,
    )
    .expect("settings load");
    assert_eq!(settings.expansion.max_instances, 1000);

    let registry = ZoneRegistry::with_aliases(&settings.zones.aliases).expect("aliases resolve");
    let options =
        ExpansionOptions::from_config(&settings.expansion, &registry).expect("zone resolves");
    assert_eq!(options.zone, Tz::Europe__Berlin);
    assert_eq!(options.week_start, WeekStart::Sunday);

    // 23:30 UTC is already the next day in Berlin
    let spec = RecurrenceSpec::daily(at(2024, 1, 1, 23, 30), 1).with_count(2);
    let set = expand_with(&spec, &options).occurrences;
    assert_eq!(set.as_slice()[0].normalized_day, day_of(date(2024, 1, 2)));
    assert_eq!(set.as_slice()[1].normalized_day, day_of(date(2024, 1, 3)));
}

#[test_log::test]
fn windows_zone_names_resolve() {
    let registry = ZoneRegistry::new();

    assert_eq!(
        registry.resolve("W. Europe Standard Time"),
        Ok(Tz::Europe__Berlin)
    );
    assert!(registry.resolve("Not/AZone").is_err());
}

#[test_log::test]
fn stored_request_recovers_instead_of_failing() {
    let request = RuleRequest::parse(
        r#"
        stored = true

        [rule]
        type = "yearly"
        interval = 1
        month = 13
        day_in_month = 1
        start = "2024-06-01T12:00:00Z"
        "#,
        FileFormat::Toml,
    )
    .expect("request parses");

    let expansion = request
        .run(ExpansionOptions::default())
        .expect("stored rule recovers");
    assert!(expansion.is_degraded());
    assert_eq!(
        start_dates(&expansion.occurrences),
        vec![date(2024, 6, 1)]
    );
}
