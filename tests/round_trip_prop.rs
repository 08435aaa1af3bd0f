use chrono::{NaiveDate, NaiveTime};
use moncli_columns::domain::value::{
    CheckboxValue, DateTimeValue, DateValue, Email, EmailValue, Link, LinkValue, LongTextValue,
    NumbersValue, PeopleValue, PersonOrTeam, RatingValue, TextValue, TimelineValue, MAX_RATING,
};
use moncli_columns::domain::{create_column_value, ColumnMeta, ColumnType, ColumnVariant};
use proptest::prelude::*;
use serde_json::json;

const STATUS_SETTINGS: &str = r#"{"labels": {"0": "Working on it", "1": "Done", "2": "Stuck", "5": "Blocked"}}"#;

const DROPDOWN_SETTINGS: &str = r#"{"labels": [
    {"id": 1, "name": "Date"},
    {"id": 2, "name": "Datetime"},
    {"id": 3, "name": "Text"},
    {"id": 4, "name": "Numeric"}
]}"#;

fn meta() -> ColumnMeta {
    ColumnMeta::new("col", "Column")
}

fn valid_date() -> impl Strategy<Value = NaiveDate> {
    (1i32..=9999, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| {
        NaiveDate::from_ymd_opt(y, m, d).expect("day 1-28 exists in every month")
    })
}

fn time_of_day() -> impl Strategy<Value = Option<NaiveTime>> {
    proptest::option::of((0u32..24, 0u32..60, 0u32..60).prop_map(|(h, m, s)| {
        NaiveTime::from_hms_opt(h, m, s).expect("in-range time")
    }))
}

fn person_or_team() -> impl Strategy<Value = PersonOrTeam> {
    (0i64..1_000_000, any::<bool>()).prop_map(|(id, team)| {
        if team {
            PersonOrTeam::team(id)
        } else {
            PersonOrTeam::person(id)
        }
    })
}

proptest! {
    #[test]
    fn text_reloads_from_its_wire_form(text in ".*") {
        let mut value = TextValue::new(meta());
        value.set(json!(text)).unwrap();

        let mut reloaded = TextValue::new(meta());
        reloaded.load(&value.format().to_string()).unwrap();
        prop_assert_eq!(reloaded.value(), Some(text.as_str()));
    }

    #[test]
    fn numbers_reload_from_their_wire_form(number in -1e12f64..1e12f64) {
        let mut value = NumbersValue::new(meta());
        value.set_number(number).unwrap();

        let mut reloaded = NumbersValue::new(meta());
        reloaded.load(&value.format().to_string()).unwrap();
        prop_assert_eq!(reloaded.value(), Some(number));
    }

    #[test]
    fn dates_reload_from_their_wire_form(date in valid_date(), time in time_of_day()) {
        let mut value = DateValue::new(meta());
        match time {
            Some(time) => value.set_datetime(date.and_time(time)).unwrap(),
            None => value.set_date(date).unwrap(),
        }

        let mut reloaded = DateValue::new(meta());
        reloaded.load(&value.format().to_string()).unwrap();
        prop_assert_eq!(reloaded.value(), Some(DateTimeValue::new(date, time)));
    }

    #[test]
    fn people_reload_from_their_wire_form(entries in proptest::collection::vec(person_or_team(), 0..8)) {
        let mut value = PeopleValue::new(meta());
        for entry in &entries {
            value.push(*entry);
        }

        let mut reloaded = PeopleValue::new(meta());
        reloaded.load(&value.format().to_string()).unwrap();
        prop_assert_eq!(reloaded.value(), value.value());
    }

    #[test]
    fn rejected_ratings_leave_value_unchanged(
        current in 1i64..=5,
        rejected in prop_oneof![i64::MIN..0i64, 6i64..=i64::MAX],
    ) {
        let mut value = RatingValue::new(meta());
        value.set(json!(current)).unwrap();

        prop_assert!(value.set(json!(rejected)).is_err());
        prop_assert_eq!(value.value().map(i64::from), Some(current));
    }

    #[test]
    fn checkbox_reloads_from_its_wire_form(checked in any::<bool>()) {
        let mut value = CheckboxValue::new(meta());
        value.set_checked(checked);

        let mut reloaded = CheckboxValue::new(meta());
        reloaded.load(&value.format().to_string()).unwrap();
        prop_assert_eq!(reloaded.value(), checked);
    }

    #[test]
    fn long_text_reloads_from_its_wire_form(text in ".*") {
        let mut value = LongTextValue::new(meta());
        value.set_text(text.clone());

        let mut reloaded = LongTextValue::new(meta());
        reloaded.load(&value.format().to_string()).unwrap();
        prop_assert_eq!(reloaded.value(), Some(text.as_str()));
    }

    #[test]
    fn email_reloads_from_its_wire_form(
        address in "[a-z0-9._]{1,10}@[a-z]{1,10}\\.(com|org|io)",
        text in "[A-Za-z][A-Za-z ]{0,15}",
    ) {
        let mut value = EmailValue::new(meta());
        value.set_email(Email::with_text(address, text)).unwrap();

        let mut reloaded = EmailValue::new(meta());
        reloaded.load(&value.format().to_string()).unwrap();
        prop_assert_eq!(reloaded.value(), value.value());
    }

    #[test]
    fn link_reloads_from_its_wire_form(
        url in "https?://[a-z]{1,12}\\.(com|org)(/[a-z0-9]{0,8})?",
        text in "[A-Za-z][A-Za-z ]{0,15}",
    ) {
        let mut value = LinkValue::new(meta());
        value.set_link(Link::with_text(url, text)).unwrap();

        let mut reloaded = LinkValue::new(meta());
        reloaded.load(&value.format().to_string()).unwrap();
        prop_assert_eq!(reloaded.value(), value.value());
    }

    #[test]
    fn rating_reloads_from_its_wire_form(rating in 1i64..=i64::from(MAX_RATING)) {
        let mut value = RatingValue::new(meta());
        value.set_rating(rating).unwrap();

        let mut reloaded = RatingValue::new(meta());
        reloaded.load(&value.format().to_string()).unwrap();
        prop_assert_eq!(reloaded.value().map(i64::from), Some(rating));
    }

    #[test]
    fn timeline_reloads_from_its_wire_form(a in valid_date(), b in valid_date()) {
        let mut value = TimelineValue::new(meta());
        value.set_range(a.min(b), a.max(b)).unwrap();

        let mut reloaded = TimelineValue::new(meta());
        reloaded.load(&value.format().to_string()).unwrap();
        prop_assert_eq!(reloaded.value(), value.value());
    }

    #[test]
    fn status_reloads_from_its_wire_form(
        label in prop_oneof![
            Just("Working on it"),
            Just("Done"),
            Just("Stuck"),
            Just("Blocked"),
        ],
    ) {
        let mut value =
            create_column_value(ColumnType::Status, "status", "Status", None, Some(STATUS_SETTINGS))
                .unwrap();
        value.set(json!(label)).unwrap();

        let reloaded = create_column_value(
            ColumnType::Status,
            "status",
            "Status",
            Some(&value.format().to_string()),
            Some(STATUS_SETTINGS),
        )
        .unwrap();
        prop_assert_eq!(reloaded.value(), json!(label));
        prop_assert_eq!(reloaded.format(), value.format());
    }

    #[test]
    fn dropdown_reloads_mixed_ids_and_labels(
        picks in proptest::collection::vec((1i64..=4, any::<bool>()), 0..6),
    ) {
        let names = ["Date", "Datetime", "Text", "Numeric"];
        let input: Vec<_> = picks
            .iter()
            .map(|(id, by_name)| {
                if *by_name {
                    json!(names[(*id - 1) as usize])
                } else {
                    json!(id)
                }
            })
            .collect();

        let mut value = create_column_value(
            ColumnType::Dropdown,
            "dropdown",
            "Dropdown",
            None,
            Some(DROPDOWN_SETTINGS),
        )
        .unwrap();
        value.set(json!(input)).unwrap();

        let reloaded = create_column_value(
            ColumnType::Dropdown,
            "dropdown",
            "Dropdown",
            Some(&value.format().to_string()),
            Some(DROPDOWN_SETTINGS),
        )
        .unwrap();
        prop_assert_eq!(reloaded.value(), value.value());
        prop_assert_eq!(reloaded.format(), value.format());
    }
}
