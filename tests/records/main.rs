//! Integration tests for `#[derive(Record)]` on caller-defined schemas.

use orderview::coerce;
use orderview::{filter, DateRange, FilterCriteria, Grouping, Record, RecordStore, ScopedResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Custom schema with every role marked.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Record)]
#[record(collection = "payouts")]
#[serde(rename_all = "camelCase")]
struct Payout {
    #[record(id)]
    #[serde(deserialize_with = "coerce::flexible_id")]
    reference: String,

    #[record(search)]
    courier_name: String,

    #[record(search)]
    #[serde(default, deserialize_with = "coerce::non_empty")]
    note: Option<String>,

    #[record(category)]
    state: String,

    #[record(timestamp)]
    #[serde(default, deserialize_with = "coerce::non_empty")]
    paid_at: Option<String>,

    #[serde(default, deserialize_with = "coerce::amount")]
    amount: f64,
}

/// Relies on the defaults: collection from the type name, `id` field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Record)]
struct MenuItem {
    id: String,
    #[record(search)]
    name: String,
}

fn payouts() -> Vec<Payout> {
    serde_json::from_value(json!([
        { "reference": 1, "courierName": "Ama", "note": "weekend bonus", "state": "paid", "paidAt": "2024-05-01T18:00:00Z", "amount": "40.00" },
        { "reference": "2", "courierName": "Yaw", "note": "", "state": "pending", "amount": 12.5 },
        { "reference": 3, "courierName": "Ama", "state": "paid", "paidAt": "2024-05-09", "amount": 10 }
    ]))
    .unwrap()
}

#[test]
fn explicit_roles() {
    let all = payouts();
    assert_eq!(Payout::COLLECTION, "payouts");
    assert_eq!(all[0].id(), "1");
    assert_eq!(all[0].search_fields(), vec!["Ama", "weekend bonus"]);
    // blank note is skipped
    assert_eq!(all[1].search_fields(), vec!["Yaw"]);
    assert_eq!(all[1].category(), Some("pending"));
    assert_eq!(all[1].timestamp(), None);
}

#[test]
fn default_collection_and_id() {
    let item = MenuItem {
        id: "m-1".into(),
        name: "Kelewele".into(),
    };
    assert_eq!(MenuItem::COLLECTION, "menu_items");
    assert_eq!(item.id(), "m-1");
    assert_eq!(item.search_fields(), vec!["Kelewele"]);
    assert_eq!(item.category(), None);
    assert_eq!(item.timestamp(), None);
}

#[test]
fn missing_category_only_matches_all_statuses() {
    let items = vec![MenuItem {
        id: "m-1".into(),
        name: "Waakye".into(),
    }];
    assert_eq!(filter::apply(&items, &FilterCriteria::new()).len(), 1);
    let criteria = FilterCriteria::new().with_status("Delivered");
    assert!(filter::apply(&items, &criteria).is_empty());
}

#[test]
fn custom_records_run_through_pipeline() {
    let mut store = RecordStore::<Payout>::scoped("fleet-1");
    assert!(store
        .apply(ScopedResponse::new("fleet-1", payouts()))
        .is_applied());

    let criteria = FilterCriteria::new()
        .with_query("ama")
        .with_status("paid")
        .with_date_range(DateRange::days(
            chrono::NaiveDate::from_ymd_opt(2024, 5, 1),
            chrono::NaiveDate::from_ymd_opt(2024, 5, 7),
        ));
    let hits = filter::apply(store.current(), &criteria);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id(), "1");

    let groups = Grouping::by(|p: &Payout| Some(p.courier_name.clone()))
        .sum("amount", |p: &Payout| p.amount)
        .run(store.current());
    assert_eq!(groups[0].key, "Ama");
    assert_eq!(groups[0].sum("amount"), 50.0);
    assert_eq!(groups[1].key, "Yaw");
}

#[test]
fn rejects_records_failing_schema() {
    let decoded = orderview::decode_collection::<Payout>(
        br#"[{"reference": 9, "courierName": "Esi", "state": "paid"}, {"courierName": "Kojo", "state": "paid"}, 42]"#,
    )
    .unwrap();
    assert_eq!(decoded.records.len(), 1);
    assert_eq!(decoded.rejected, 2);
}
