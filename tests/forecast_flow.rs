//! End-to-end properties of the forecasting pipeline.

use chrono::{Datelike, Duration, NaiveDate};
use pricecast::application::feature_engineering::build_features;
use pricecast::application::forecasting::{pick_best_day, project_week};
use pricecast::application::model_training::{CV_SEED, train};
use pricecast::domain::recommendation::weekday_name;
use pricecast::{
    PriceRecord, PurchasePolicy, Recommendation, RecommendationStatus, forecast, forecast_at,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .ok();
}

fn record(date: NaiveDate, price: Decimal) -> PriceRecord {
    PriceRecord {
        date,
        price,
        supermarket: "SuperA".to_string(),
        brand: Some("BrandA".to_string()),
        location: "Berlin".to_string(),
        weight_grams: Some(500.0),
    }
}

fn daily_history(start: NaiveDate, prices: &[Decimal]) -> Vec<PriceRecord> {
    prices
        .iter()
        .enumerate()
        .map(|(i, price)| record(start + Duration::days(i as i64), *price))
        .collect()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn too_little_history_yields_insufficient_data() {
    init_tracing();

    let empty = forecast(&[]).unwrap();
    assert_eq!(empty, Recommendation::insufficient_data());

    let single = forecast(&[record(day(2024, 1, 1), dec!(1.50))]).unwrap();
    assert_eq!(single.status, RecommendationStatus::InsufficientData);
    assert_eq!(single.confidence, 0.0);
    assert!(single.best_day.is_none());
    assert!(single.predicted_price.is_none());
    assert!(single.average_price.is_none());
}

#[test]
fn confidence_stays_within_bounds() {
    let histories = [
        vec![dec!(1.50), dec!(1.50)],
        vec![dec!(1.00), dec!(5.00), dec!(1.00), dec!(5.00), dec!(1.00)],
        vec![dec!(0.10), dec!(99.0), dec!(0.10), dec!(99.0)],
        (0..30).map(|i| Decimal::from(i % 4 + 1)).collect(),
    ];

    for prices in histories {
        let records = daily_history(day(2024, 3, 1), &prices);
        let rec = forecast_at(&records, day(2024, 4, 15)).unwrap();
        assert!(
            (0.0..=100.0).contains(&rec.confidence),
            "confidence {} out of bounds",
            rec.confidence
        );
    }
}

#[test]
fn volatile_prices_erode_confidence() {
    let calm: Vec<Decimal> = (0..10)
        .map(|i| if i % 2 == 0 { dec!(1.50) } else { dec!(1.51) })
        .collect();
    let choppy: Vec<Decimal> = (0..10)
        .map(|i| if i % 2 == 0 { dec!(1.00) } else { dec!(5.00) })
        .collect();

    let today = day(2024, 4, 1);
    let calm_rec = forecast_at(&daily_history(day(2024, 3, 1), &calm), today).unwrap();
    let choppy_rec = forecast_at(&daily_history(day(2024, 3, 1), &choppy), today).unwrap();

    assert!(
        choppy_rec.confidence < calm_rec.confidence,
        "choppy {} should score below calm {}",
        choppy_rec.confidence,
        calm_rec.confidence
    );
}

#[test]
fn best_day_is_the_argmin_of_the_week() {
    let prices: Vec<Decimal> = (0..14)
        .map(|i| dec!(2.00) + Decimal::from(i % 5) * dec!(0.10))
        .collect();
    let records = daily_history(day(2024, 2, 1), &prices);
    let today = day(2024, 2, 20);

    let rec = forecast_at(&records, today).unwrap();
    assert_eq!(rec.status, RecommendationStatus::Ok);

    // replay the pipeline stage by stage and compare
    let features = build_features(&records);
    let trained = train(&features, CV_SEED).unwrap();
    let predictions =
        project_week(&trained, &features.schema, features.x.last().unwrap(), today).unwrap();
    assert_eq!(predictions.len(), 7);

    let best = pick_best_day(&predictions).unwrap();
    for p in &predictions {
        assert!(best.price <= p.price);
    }
    assert_eq!(rec.best_day.as_deref(), Some(weekday_name(best.date.weekday())));
}

#[test]
fn forecast_is_deterministic() {
    let prices: Vec<Decimal> = (0..12)
        .map(|i| dec!(1.00) + Decimal::from(i % 3) * dec!(0.25))
        .collect();
    let records = daily_history(day(2024, 5, 1), &prices);
    let today = day(2024, 5, 20);

    let first = forecast_at(&records, today).unwrap();
    let second = forecast_at(&records, today).unwrap();
    assert_eq!(first, second);
}

#[test]
fn input_order_does_not_matter() {
    let prices: Vec<Decimal> = vec![
        dec!(2.10),
        dec!(1.90),
        dec!(2.30),
        dec!(2.00),
        dec!(1.80),
        dec!(2.20),
    ];
    let records = daily_history(day(2024, 5, 1), &prices);
    let mut reversed = records.clone();
    reversed.reverse();
    let mut interleaved: Vec<PriceRecord> = Vec::new();
    for i in 0..records.len() {
        interleaved.push(records[if i % 2 == 0 { i / 2 } else { records.len() - 1 - i / 2 }].clone());
    }

    let today = day(2024, 5, 20);
    let baseline = forecast_at(&records, today).unwrap();
    assert_eq!(baseline, forecast_at(&reversed, today).unwrap());
    assert_eq!(baseline, forecast_at(&interleaved, today).unwrap());
}

#[test]
fn sparse_two_record_history() {
    // a Monday and a Wednesday
    let records = vec![
        record(day(2024, 1, 1), dec!(1.50)),
        record(day(2024, 1, 3), dec!(1.60)),
    ];

    let rec = forecast_at(&records, day(2024, 1, 5)).unwrap();
    assert_eq!(rec.status, RecommendationStatus::Ok);
    assert!(WEEKDAYS.contains(&rec.best_day.as_deref().unwrap()));
    assert!(rec.predicted_price.is_some());
    assert_eq!(rec.average_price, Some(dec!(1.55)));
    // rolling deviation of the pair is small but non-zero
    assert!(rec.confidence > 95.0 && rec.confidence < 100.0);
}

#[test]
fn stable_price_gives_full_confidence() {
    let records = vec![
        record(day(2024, 1, 1), dec!(1.50)),
        record(day(2024, 1, 3), dec!(1.50)),
    ];

    let rec = forecast_at(&records, day(2024, 1, 5)).unwrap();
    assert_eq!(rec.status, RecommendationStatus::Ok);
    assert_eq!(rec.confidence, 100.0);
}

#[test]
fn recommendation_round_trips_through_serde() {
    let records = daily_history(
        day(2024, 5, 1),
        &[dec!(1.50), dec!(1.55), dec!(1.45), dec!(1.50)],
    );
    let rec = forecast_at(&records, day(2024, 5, 10)).unwrap();

    let json = serde_json::to_string(&rec).unwrap();
    let back: Recommendation = serde_json::from_str(&json).unwrap();
    assert_eq!(rec, back);
}

#[test]
fn purchase_policy_triggers_only_on_the_best_day() {
    let records = vec![
        record(day(2024, 1, 1), dec!(1.50)),
        record(day(2024, 1, 3), dec!(1.50)),
    ];
    let today = day(2024, 1, 5);
    let rec = forecast_at(&records, today).unwrap();
    assert_eq!(rec.confidence, 100.0);

    let policy = PurchasePolicy::default();
    let best_day = rec.best_day.as_deref().unwrap();
    for offset in 0..7 {
        let candidate = today + Duration::days(offset);
        let advice = policy.evaluate(&rec, candidate);
        let is_best = weekday_name(candidate.weekday()) == best_day;
        assert_eq!(advice.buy_now, is_best);
    }
}
