//! Rule validation through the raw input path.

use almanac_test::component::{
    ExpansionOptions, RawRecurrence, RecurrenceField, RecurrenceType, ValidationError, expand,
    validate,
};
use almanac_test::component::error::RecurError;

fn raw(json: &str) -> RawRecurrence {
    serde_json::from_str(json).expect("valid raw recurrence json")
}

fn check(json: &str) -> Result<(), ValidationError> {
    check_raw(&raw(json))
}

#[test_log::test]
fn weekly_without_weekday_mask_is_incomplete() {
    let result = check(
        r#"{ "type": "weekly", "interval": 1, "start": "2024-01-01T09:00:00Z" }"#,
    );
    assert_eq!(
        result,
        Err(ValidationError::IncompleteRecurrenceField {
            field: RecurrenceField::WeekdayMask,
            recurrence: RecurrenceType::Weekly,
        })
    );
}

#[test_log::test]
fn daily_with_weekday_mask_is_unnecessary() {
    let result = check(
        r#"{ "type": "daily", "interval": 1, "weekday_mask": 5, "start": "2024-01-01T09:00:00Z" }"#,
    );
    assert_eq!(
        result,
        Err(ValidationError::UnnecessaryRecurrenceInformation {
            field: RecurrenceField::WeekdayMask,
            recurrence: RecurrenceType::Daily,
        })
    );
}

#[test_log::test]
fn monthly_on_the_31st_is_accepted() {
    let result = check(
        r#"{ "type": "monthly", "interval": 1, "day_in_month": 31, "start": "2024-01-31T09:00:00Z" }"#,
    );
    assert_eq!(result, Ok(()));
}

#[test_log::test]
fn weekly_with_empty_mask_is_out_of_range() {
    let result = check(
        r#"{ "type": "weekly", "interval": 1, "weekday_mask": 0, "start": "2024-01-01T09:00:00Z" }"#,
    );
    assert_eq!(
        result,
        Err(ValidationError::InvalidWeekdayMask {
            value: 0,
            recurrence: RecurrenceType::Weekly,
        })
    );
}

#[test_log::test]
fn yearly_without_month_is_incomplete() {
    let result = check(
        r#"{ "type": "yearly", "interval": 1, "day_in_month": 15, "start": "2024-03-15T09:00:00Z" }"#,
    );
    assert_eq!(
        result,
        Err(ValidationError::IncompleteRecurrenceField {
            field: RecurrenceField::Month,
            recurrence: RecurrenceType::Yearly,
        })
    );
}

#[test_log::test]
fn until_and_count_together_are_redundant() {
    let result = check(
        r#"{
            "type": "daily",
            "interval": 1,
            "until": "2024-02-01T00:00:00Z",
            "occurrence_count": 10,
            "start": "2024-01-01T09:00:00Z"
        }"#,
    );
    assert_eq!(
        result,
        Err(ValidationError::RedundantUntilAndOccurrenceCount {
            recurrence: RecurrenceType::Daily,
        })
    );
}

#[test_log::test]
fn nth_weekday_above_five_is_rejected() {
    let result = check(
        r#"{
            "type": "monthly",
            "interval": 1,
            "weekday_mask": 4,
            "day_in_month": 6,
            "start": "2024-01-09T09:00:00Z"
        }"#,
    );
    assert_eq!(
        result,
        Err(ValidationError::InvalidNthWeekday {
            value: 6,
            recurrence: RecurrenceType::Monthly,
        })
    );
}

#[test_log::test]
fn errors_name_field_and_recurrence() {
    let err = check(
        r#"{ "type": "daily", "interval": 1, "month": 3, "start": "2024-01-01T09:00:00Z" }"#,
    )
    .expect_err("month is not allowed for daily rules");

    assert_eq!(err.field(), RecurrenceField::Month);
    assert_eq!(err.recurrence(), Some(RecurrenceType::Daily));
    assert!(err.to_string().contains("daily"));
}

#[test_log::test]
fn expand_rejects_invalid_input_without_generating() {
    let raw = raw(r#"{ "type": "weekly", "interval": 1, "start": "2024-01-01T09:00:00Z" }"#);

    let result = expand(&raw, &ExpansionOptions::default());
    assert!(matches!(
        result,
        Err(RecurError::Validation(ValidationError::IncompleteRecurrenceField { .. }))
    ));
}

#[test_log::test]
fn validation_does_not_touch_input() {
    let raw = raw(
        r#"{ "type": "weekly", "interval": 1, "weekday_mask": 200, "start": "2024-01-01T09:00:00Z" }"#,
    );
    let before = raw.clone();

    assert!(check_raw(&raw).is_err());
    assert_eq!(raw, before);
}

#[test_log::test]
fn until_and_count_cleared_together_mean_infinite() {
    let raw = raw(
        r#"{
            "type": "daily",
            "interval": 1,
            "until": null,
            "occurrence_count": null,
            "start": "2024-01-01T09:00:00Z"
        }"#,
    );
    assert!(raw.presence().contains(RecurrenceField::Until));
    assert!(raw.presence().contains(RecurrenceField::OccurrenceCount));
    assert_eq!(check_raw(&raw), Ok(()));
    assert!(!raw.to_spec().is_bounded());
}

#[test_log::test]
fn declared_null_field_is_unnecessary_for_plain_appointment() {
    let result = check(r#"{ "type": "none", "interval": null, "start": "2024-01-01T09:00:00Z" }"#);
    assert_eq!(
        result,
        Err(ValidationError::UnnecessaryRecurrenceInformation {
            field: RecurrenceField::Interval,
            recurrence: RecurrenceType::None,
        })
    );
}

#[test_log::test]
fn declared_null_mask_is_out_of_range() {
    let result = check(
        r#"{ "type": "weekly", "interval": 1, "weekday_mask": null, "start": "2024-01-01T09:00:00Z" }"#,
    );
    assert_eq!(
        result,
        Err(ValidationError::InvalidWeekdayMask {
            value: 0,
            recurrence: RecurrenceType::Weekly,
        })
    );
}

fn check_raw(raw: &RawRecurrence) -> Result<(), ValidationError> {
    validate(raw.presence(), &raw.to_spec())
}
