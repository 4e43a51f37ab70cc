use chrono::{Days, NaiveDate, NaiveDateTime};
use nutri_budget::budget::FallbackReason;
use nutri_budget::classify::{ActivityLevel, Goal, Sex};
use nutri_budget::records::{meals_from_json, metrics_from_json};
use nutri_budget::tips::Tip;
use nutri_budget::{day_key, EngineConfig, MealEntry, NutritionEngine, UserMetrics};
use serde_json::json;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn engine() -> NutritionEngine {
    init_tracing();
    NutritionEngine::default()
}

fn metrics(weight: &str, height: &str, age: &str, sex: &str, goal: &str) -> UserMetrics {
    UserMetrics {
        weight: Some(weight.to_string()),
        height: Some(height.to_string()),
        age: Some(age.to_string()),
        sex: Some(sex.to_string()),
        activity_level: None,
        goal: Some(goal.to_string()),
    }
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(date: NaiveDate, hour: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, 0, 0).unwrap()
}

fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("value should be present");
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn male_sedentary_maintenance() {
    let budget = engine().compute_budget(Some(&metrics("70", "175", "25", "homme", "maintien")));

    assert_close(budget.bmr, 1673.75);
    assert_close(budget.tdee, 2008.5);
    assert_eq!(budget.daily_budget, 2009);
    assert_eq!(budget.sex, Sex::Male);
    assert_eq!(budget.activity, ActivityLevel::Sedentary);
    assert!(!budget.is_fallback());
}

#[test]
fn female_sedentary_maintenance() {
    let budget = engine().compute_budget(Some(&metrics("60", "165", "25", "femme", "maintien")));

    assert_close(budget.bmr, 1345.25);
    assert_close(budget.tdee, 1614.3);
    assert_eq!(budget.daily_budget, 1614);
}

#[test]
fn male_moderately_active() {
    let m = metrics("80", "180", "25", "Homme", "maintien").with_activity("modérément actif");
    let budget = engine().compute_budget(Some(&m));

    assert_close(budget.bmr, 1805.0);
    assert_close(budget.tdee, 2797.75);
    assert_eq!(budget.daily_budget, 2798);
    assert_eq!(budget.activity, ActivityLevel::ModeratelyActive);
}

#[test]
fn female_weight_loss() {
    let budget =
        engine().compute_budget(Some(&metrics("60", "165", "30", "femme", "Perte de poids")));

    assert_close(budget.bmr, 1320.25);
    assert_close(budget.tdee, 1584.3);
    assert_eq!(budget.daily_budget, 1084);
    assert_eq!(budget.goal, Goal::WeightLoss);
}

#[test]
fn muscle_gain_adds_surplus() {
    let budget =
        engine().compute_budget(Some(&metrics("70", "175", "25", "homme", "Prise de masse")));
    assert_eq!(budget.daily_budget, 2509);
}

#[test]
fn unreadable_metrics_use_fallback_budget() {
    let engine = engine();

    let none = engine.compute_budget(None);
    assert_eq!(none.daily_budget, 2000);
    assert_eq!(none.fallback, Some(FallbackReason::MissingMetrics));
    assert!(none.bmr.is_none() && none.tdee.is_none());

    let empty = engine.compute_budget(Some(&UserMetrics::default()));
    assert_eq!(empty.daily_budget, 2000);
    assert!(empty.is_fallback());

    for bad in [
        metrics("abc", "175", "25", "homme", ""),
        metrics("70", "tall", "25", "homme", ""),
        metrics("70", "175", "old", "homme", ""),
    ] {
        let budget = engine.compute_budget(Some(&bad));
        assert_eq!(budget.daily_budget, 2000, "metrics {bad:?} should fall back");
        assert!(matches!(
            budget.fallback,
            Some(FallbackReason::InvalidNumber { .. })
        ));
    }
}

#[test]
fn numeric_fields_read_the_leading_number() {
    let engine = engine();

    let comma = engine.compute_budget(Some(&metrics("60,9", "165", "25", "femme", "maintien")));
    assert_close(comma.bmr, 1345.25);
    assert_eq!(comma.daily_budget, 1614);

    let exponent = engine.compute_budget(Some(&metrics("7e1", "175", "25", "homme", "maintien")));
    assert_close(exponent.bmr, 1673.75);
    assert_eq!(exponent.daily_budget, 2009);

    let huge = engine.compute_budget(Some(&metrics("1e300", "175", "25", "homme", "maintien")));
    assert!(!huge.is_fallback());
    assert_eq!(huge.daily_budget, i64::MAX);
    let _ = engine.compute_macros(huge.daily_budget).gram_calories();
}

#[test]
fn budget_is_deterministic() {
    let engine = engine();
    let m = metrics("82.5", "178", "41", "male", "lose weight").with_activity("very active");
    assert_eq!(engine.compute_budget(Some(&m)), engine.compute_budget(Some(&m)));
}

#[test]
fn macros_keep_rounding_drift() {
    let macros = engine().compute_macros(2000);
    assert_eq!(macros.protein_grams, 125);
    assert_eq!(macros.carb_grams, 250);
    assert_eq!(macros.fat_grams, 56);
    assert_eq!(macros.gram_calories(), 2004);
}

#[test]
fn three_big_meals_are_over_budget() {
    let engine = engine();
    let today = "10/03/2025";
    let meals: Vec<MealEntry> = (0..3)
        .map(|_| MealEntry::new("plate", today, 1000.0).with_macros(30.0, 100.0, 20.0))
        .collect();

    let totals = engine.aggregate_totals(&meals, today);
    assert_eq!(totals.calories, 3000.0);
    assert_eq!(totals.protein_grams, 90.0);
    assert_eq!(totals.carb_grams, 300.0);
    assert_eq!(totals.fat_grams, 60.0);

    let budget = engine.compute_budget(Some(&metrics("60", "165", "25", "femme", "maintien")));
    let status = engine.daily_status(&totals, budget.daily_budget);
    assert!(status.over_budget);
    assert_eq!(status.remaining, 0);
    assert_eq!(status.overshoot, 3000 - budget.daily_budget);

    for hour in 0..24 {
        assert_eq!(
            engine.select_tip(totals.calories, budget.daily_budget, hour),
            Tip::OverBudget
        );
    }
}

#[test]
fn aggregation_is_idempotent_and_filters_by_day() {
    let engine = engine();
    let meals = vec![
        MealEntry::new("lunch", "10/03/2025", 700.0),
        MealEntry::new("late", "9/3/2025", 400.0),
        MealEntry::new("dinner", "10/3/2025", 500.0),
    ];

    let first = engine.aggregate_totals(&meals, "10/03/2025");
    let second = engine.aggregate_totals(&meals, "10/03/2025");
    assert_eq!(first, second);
    assert_eq!(first.calories, 1200.0);
    assert_eq!(first.meal_count, 2);
}

#[test]
fn streak_stops_at_gap() {
    let today = day(2025, 3, 10);
    let key = |offset: u64| day_key::format(today - Days::new(offset));
    let meals = vec![
        MealEntry::new("today", &key(0), 500.0),
        MealEntry::new("yesterday", &key(1), 500.0),
        MealEntry::new("three days ago", &key(3), 500.0),
    ];

    assert_eq!(engine().compute_streak(&meals, today), 2);
}

#[test]
fn weekly_series_uses_current_budget() {
    let today = day(2025, 3, 10);
    let meals = vec![
        MealEntry::new("feast", "08/03/2025", 2600.0),
        MealEntry::new("light", "10/03/2025", 1200.0),
        MealEntry::new("too old", "02/03/2025", 5000.0),
    ];

    let series = engine().build_weekly_series(&meals, today, 2009);
    let kcal: Vec<f64> = series.days.iter().map(|d| d.calories).collect();
    assert_eq!(kcal, vec![0.0, 0.0, 0.0, 0.0, 2600.0, 0.0, 1200.0]);

    let over: Vec<bool> = series.days.iter().map(|d| d.over_budget).collect();
    assert_eq!(over, vec![false, false, false, false, true, false, false]);
    assert_eq!(series.today().map(|d| d.label.as_str()), Some("Mon"));
}

#[test]
fn dashboard_from_store_documents() {
    let engine = engine();
    let today = day(2025, 3, 10);

    let profile = metrics_from_json(&json!({
        "prenom": "Mariam",
        "poids": "60",
        "taille": "165",
        "age": "25",
        "sexe": "femme",
        "objectif": "maintien"
    }));
    let meals = meals_from_json(&[
        json!({"name": "Msemen", "calories": 350, "proteins": 8, "carbs": 45, "fats": 15, "date": "10/03/2025"}),
        json!({"name": "Tajine", "calories": "650", "proteins": 40, "carbs": 50, "fats": 25, "date": "09/03/2025"}),
        json!({"name": "Orphan", "calories": 999}),
    ]);
    assert_eq!(meals.len(), 2);

    let snapshot = engine.dashboard(Some(&profile), &meals, 3, at(today, 8));
    assert_eq!(snapshot.day_key, "10/03/2025");
    assert_eq!(snapshot.budget.daily_budget, 1614);
    assert_eq!(snapshot.totals.calories, 350.0);
    assert_eq!(snapshot.status.remaining, 1264);
    assert!(!snapshot.status.over_budget);
    assert_eq!(snapshot.streak, 2);
    assert_eq!(snapshot.hydration_percent, 38);
    assert_eq!(snapshot.tip, Tip::MorningHydration);
    assert_eq!(snapshot.weekly.days.len(), 7);
    assert!(snapshot.badges.iter().any(|b| b.label == "Goal" && b.earned));

    let again = engine.dashboard(Some(&profile), &meals, 3, at(today, 8));
    assert_eq!(snapshot, again);
}

#[test]
fn dashboard_survives_extreme_meal_values() {
    let engine = engine();
    let today = day(2025, 3, 10);

    let meals = meals_from_json(&[
        json!({"name": "typo", "calories": "-1e19", "proteins": -5, "date": "10/03/2025"}),
    ]);
    assert_eq!(meals.len(), 1);

    let snapshot = engine.dashboard(None, &meals, 0, at(today, 8));
    assert_eq!(snapshot.totals.calories, -1e19);
    assert_eq!(snapshot.status.remaining, i64::MAX);
    assert!(!snapshot.status.over_budget);
    assert_eq!(snapshot.status.overshoot, 0);
    assert_eq!(snapshot.macro_progress.protein_percent, 0.0);

    let meals = meals_from_json(&[json!({"calories": "1e300", "date": "10/03/2025"})]);
    let snapshot = engine.dashboard(None, &meals, 0, at(today, 20));
    assert!(snapshot.status.over_budget);
    assert_eq!(snapshot.status.remaining, 0);
    assert_eq!(snapshot.status.overshoot, i64::MAX);
    assert_eq!(snapshot.tip, Tip::OverBudget);
}

#[test]
fn dashboard_evening_tips() {
    let engine = engine();
    let today = day(2025, 3, 10);
    let budget = 2000;
    let config = r#"{"budget": {"fallback_budget": 2000}}"#;
    let engine_with_config = NutritionEngine::new(EngineConfig::from_json_str(config).unwrap());

    let light = vec![MealEntry::new("snack", "10/03/2025", 900.0)];
    let snapshot = engine_with_config.dashboard(None, &light, 0, at(today, 19));
    assert_eq!(snapshot.budget.daily_budget, budget);
    assert_eq!(snapshot.tip, Tip::FullDinner);

    let heavy = vec![MealEntry::new("lunch", "10/03/2025", 1600.0)];
    let snapshot = engine.dashboard(None, &heavy, 0, at(today, 19));
    assert_eq!(snapshot.tip, Tip::LightDinner);
    assert_eq!(snapshot.hydration_percent, 0);
}

#[test]
fn snapshot_serializes() {
    let snapshot = engine().dashboard(None, &[], 8, at(day(2025, 3, 10), 2));
    let value = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(value["budget"]["daily_budget"], json!(2000));
    assert_eq!(value["tip"], json!("WellBalanced"));
    assert_eq!(value["hydration_percent"], json!(100));
    assert_eq!(value["budget"]["fallback"], json!("MissingMetrics"));
}
