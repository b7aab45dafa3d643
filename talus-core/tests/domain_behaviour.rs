//! Behavioural coverage for weather weeks and grade comparison.

use std::cell::{Cell, RefCell};

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use talus_core::{DailyWeather, Grade, WeatherPattern};

/// Shared state for each scenario.
pub struct DomainContext {
    days: Cell<usize>,
    usable: Cell<Option<bool>>,
    grades: RefCell<Option<(Grade, Grade)>>,
    difference: Cell<Option<Option<f64>>>,
}

/// Build an empty context per scenario.
#[fixture]
pub fn context() -> DomainContext {
    DomainContext {
        days: Cell::new(0),
        usable: Cell::new(None),
        grades: RefCell::new(None),
        difference: Cell::new(None),
    }
}

fn set_grades(context: &DomainContext, first: &str, second: &str) {
    let parsed = match (first.parse::<Grade>(), second.parse::<Grade>()) {
        (Ok(a), Ok(b)) => (a, b),
        other => panic!("fixture grades must parse: {other:?}"),
    };
    context.grades.replace(Some(parsed));
}

#[given("a weather week with five observed days")]
fn five_days(context: &DomainContext) {
    context.days.set(5);
}

#[given("a weather week with four observed days")]
fn four_days(context: &DomainContext) {
    context.days.set(4);
}

#[given("an ice grade and a rock grade")]
fn ice_and_rock(context: &DomainContext) {
    set_grades(context, "WI4", "5.10a");
}

#[given("two rock grades one number apart")]
fn two_rock_grades(context: &DomainContext) {
    set_grades(context, "5.10a", "5.11a");
}

#[when("I inspect the weather week")]
fn inspect_week(context: &DomainContext) {
    let day = DailyWeather {
        temperature_c: Some(-2.0),
        ..DailyWeather::default()
    };
    let mut days = vec![Some(day); context.days.get()];
    days.resize(7, None);
    let pattern = match WeatherPattern::new(days) {
        Ok(pattern) => pattern,
        Err(err) => panic!("seven slots always fit: {err}"),
    };
    context.usable.set(Some(pattern.is_valid()));
}

#[when("I compare the grades")]
fn compare_grades(context: &DomainContext) {
    let grades = context.grades.borrow();
    let Some((first, second)) = grades.as_ref() else {
        panic!("grades must be set by a given step");
    };
    context.difference.set(Some(first.difference(second)));
}

#[then("the weather week is usable for similarity")]
fn week_usable(context: &DomainContext) {
    assert_eq!(context.usable.get(), Some(true));
}

#[then("the weather week is not usable for similarity")]
fn week_unusable(context: &DomainContext) {
    assert_eq!(context.usable.get(), Some(false));
}

#[then("the grades are incomparable")]
fn grades_incomparable(context: &DomainContext) {
    assert_eq!(context.difference.get(), Some(None));
}

#[then("the grade difference is one")]
#[expect(clippy::float_arithmetic, reason = "tolerance comparison")]
fn grade_difference_one(context: &DomainContext) {
    let Some(Some(difference)) = context.difference.get() else {
        panic!("expected a comparable pair");
    };
    assert!((difference.abs() - 1.0).abs() < 1e-9);
}

#[scenario(path = "tests/features/domain.feature", index = 0)]
fn five_day_week_is_usable(context: DomainContext) {
    let _ = context;
}

#[scenario(path = "tests/features/domain.feature", index = 1)]
fn four_day_week_is_rejected(context: DomainContext) {
    let _ = context;
}

#[scenario(path = "tests/features/domain.feature", index = 2)]
fn cross_system_grades_are_incomparable(context: DomainContext) {
    let _ = context;
}

#[scenario(path = "tests/features/domain.feature", index = 3)]
fn same_system_grades_report_distance(context: DomainContext) {
    let _ = context;
}
