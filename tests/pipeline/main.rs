//! End-to-end pipeline tests: store -> filter -> group / paginate / export.

mod fixtures;

use chrono::NaiveDate;
use orderview::group::keys;
use orderview::{
    filter, orders_exporter, paginate, DateRange, FilterCriteria, Grouping, Order, RecordStore,
    Scope, ScopedResponse, StatusFilter,
};
use proptest::prelude::*;
use serde_json::json;

use fixtures::{order, orders};

#[test]
fn twenty_three_orders_page_by_ten() {
    let source = orders(23);
    let filtered = filter::apply(&source, &FilterCriteria::new());

    let first = paginate(&filtered, 1, 10);
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.total_pages, 3);

    let third = paginate(&filtered, 3, 10);
    assert_eq!(third.items.len(), 3);
    assert_eq!(third.items[0].id, "o-20");
}

#[test]
fn pass_through_criteria_return_source_unchanged() {
    let source = orders(17);
    let criteria: FilterCriteria = serde_json::from_value(json!({
        "query": "",
        "status": "All",
        "date_range": { "from": null, "to": null }
    }))
    .unwrap();

    let filtered = filter::apply(&source, &criteria);
    let expected: Vec<&Order> = source.iter().collect();
    assert_eq!(filtered, expected);
}

#[test]
fn grouping_two_orders_for_one_courier() {
    let source = vec![
        order("1", Some("Ama"), json!("12.50")),
        order("2", Some("Ama"), json!(7.50)),
    ];
    let groups = Grouping::by(keys::courier_name)
        .sum("delivery", |o: &Order| o.delivery_price)
        .run(&source);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].key, "Ama");
    assert_eq!(groups[0].count, 2);
    assert_eq!(format!("{:.2}", groups[0].sum("delivery")), "20.00");
}

#[test]
fn ungrouped_records_stay_visible_in_table() {
    let source = vec![
        order("1", Some("Ama"), json!(5)),
        order("2", None, json!(5)),
        order("3", Some("Kojo"), json!(5)),
    ];
    let filtered = filter::apply(&source, &FilterCriteria::new());

    let groups = Grouping::by(keys::courier_name).run(filtered.iter().copied());
    let grouped: usize = groups.iter().map(|g| g.count).sum();
    assert_eq!(grouped, 2);

    let page = paginate(&filtered, 1, 10);
    assert_eq!(page.total_items, 3);
    assert!(page.items.iter().any(|o| o.id == "2"));
}

#[test]
fn stale_branch_response_is_discarded() {
    let mut store = RecordStore::<Order>::new();
    store.select_scope("branch-A");
    store.select_scope("branch-B");

    let branch_b = orders(4);
    assert!(store
        .apply(ScopedResponse::new("branch-B", branch_b.clone()))
        .is_applied());

    let late = store.apply(ScopedResponse::new("branch-A", orders(9)));
    assert!(late.is_discarded());
    assert_eq!(store.scope(), Some(&Scope::new("branch-B")));
    assert_eq!(store.current(), branch_b.as_slice());
}

#[test]
fn export_covers_filtered_view_not_page() {
    let source = orders(23);
    let criteria = FilterCriteria::new().with_status("Delivered");
    let filtered = filter::apply(&source, &criteria);
    let page = paginate(&filtered, 1, 5);
    assert_eq!(page.items.len(), 5);

    let csv = orders_exporter().to_csv(filtered.iter().copied());
    // header + every delivered order
    assert_eq!(csv.lines().count(), 1 + filtered.len());
    assert!(filtered.len() > 5);
    assert!(csv.lines().skip(1).all(|line| line.contains(",Delivered,")));
}

#[test]
fn export_quotes_names_with_commas_and_quotes() {
    let source: Vec<Order> = serde_json::from_value(json!([{
        "id": 7,
        "orderNumber": "ORD-7",
        "customerName": "Mensah, Kofi",
        "restaurantName": "Auntie \"Muni\"",
        "status": "Pending",
        "createdAt": "2024-05-02T09:30:00Z",
        "deliveryPrice": "5",
        "totalPrice": 41.255
    }]))
    .unwrap();

    let csv = orders_exporter().to_csv(&source);
    let row = csv.lines().nth(1).unwrap();
    assert!(row.contains(r#""Mensah, Kofi""#));
    assert!(row.contains(r#""Auntie ""Muni""""#));
    assert!(row.ends_with(",5.00,41.26") || row.ends_with(",5.00,41.25"));
}

#[test]
fn malformed_numbers_count_as_zero() {
    let source: Vec<Order> = serde_json::from_value(json!([
        { "id": "a", "courierName": "Ama", "deliveryPrice": "abc" },
        { "id": "b", "courierName": "Ama", "deliveryPrice": null },
        { "id": "c", "courierName": "Ama", "deliveryPrice": "4.25" },
        { "id": "d", "courierName": "Ama" }
    ]))
    .unwrap();

    let groups = Grouping::by(keys::courier_name)
        .sum("delivery", |o: &Order| o.delivery_price)
        .run(&source);
    assert_eq!(groups[0].count, 4);
    assert_eq!(groups[0].sum("delivery"), 4.25);
}

#[test]
fn date_range_and_status_combine() {
    let source = orders(21);
    let criteria = FilterCriteria::new()
        .with_status(StatusFilter::from("Pending"))
        .with_date_range(DateRange::days(
            NaiveDate::from_ymd_opt(2024, 5, 1),
            NaiveDate::from_ymd_opt(2024, 5, 3),
        ));
    let filtered = filter::apply(&source, &criteria);

    assert!(!filtered.is_empty());
    for o in &filtered {
        assert_eq!(o.status, "Pending");
        assert!(o.created_at.as_str() <= "2024-05-03T12:00:00Z");
    }
}

// =============================================================================
// Properties
// =============================================================================

fn arb_order() -> impl Strategy<Value = Order> {
    (
        0u32..1000,
        prop::sample::select(vec!["Kofi", "Ama", "Yaw", "Esi", "kojo"]),
        prop::option::of(prop::sample::select(vec!["Ama", "Kojo", ""])),
        prop::sample::select(vec!["Pending", "Delivered", "Cancelled"]),
        prop::sample::select(vec![
            "2024-05-01T08:00:00Z",
            "2024-05-03",
            "2024-05-05 18:30:00",
            "not-a-date",
            "",
        ]),
        prop::sample::select(vec![json!(12.5), json!("7.50"), json!(""), json!(null), json!("abc")]),
    )
        .prop_map(|(n, customer, courier, status, created_at, delivery)| {
            serde_json::from_value(json!({
                "id": format!("o-{}", n),
                "orderNumber": format!("ORD-{}", n),
                "customerName": customer,
                "courierName": courier,
                "status": status,
                "createdAt": created_at,
                "deliveryPrice": delivery,
            }))
            .expect("generated order")
        })
}

fn arb_criteria() -> impl Strategy<Value = FilterCriteria> {
    (
        prop::sample::select(vec!["", "a", "KO", "ord-1", "zzz"]),
        prop::sample::select(vec!["All", "Pending", "Delivered"]),
        prop::option::of(prop::sample::select(vec![
            (Some(1u32), None),
            (None, Some(3u32)),
            (Some(2), Some(4)),
        ])),
    )
        .prop_map(|(query, status, days)| {
            let range = days
                .map(|(from, to)| {
                    DateRange::days(
                        from.and_then(|d| NaiveDate::from_ymd_opt(2024, 5, d)),
                        to.and_then(|d| NaiveDate::from_ymd_opt(2024, 5, d)),
                    )
                })
                .unwrap_or_default();
            FilterCriteria::new()
                .with_query(query)
                .with_status(status)
                .with_date_range(range)
        })
}

proptest! {
    #[test]
    fn filter_is_idempotent(source in prop::collection::vec(arb_order(), 0..40), criteria in arb_criteria()) {
        let once = filter::apply_cloned(&source, &criteria);
        let twice = filter::apply_cloned(&once, &criteria);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn filter_is_stable(source in prop::collection::vec(arb_order(), 0..40), criteria in arb_criteria()) {
        let positions: Vec<usize> = filter::apply(&source, &criteria)
            .into_iter()
            .map(|hit| source.iter().position(|o| std::ptr::eq(o, hit)).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn aggregation_conserves_totals(source in prop::collection::vec(arb_order(), 0..40), criteria in arb_criteria()) {
        let filtered = filter::apply(&source, &criteria);
        let grouping = Grouping::by(keys::courier_name).sum("delivery", |o: &Order| o.delivery_price);

        let groups = grouping.run(filtered.iter().copied());
        let totals = grouping.totals(filtered.iter().copied());

        let grouped_sum: f64 = groups.iter().map(|g| g.sum("delivery")).sum();
        let grouped_count: usize = groups.iter().map(|g| g.count).sum();
        prop_assert!((grouped_sum - totals.sum("delivery")).abs() < 1e-9);
        prop_assert_eq!(grouped_count, totals.count);
    }

    #[test]
    fn pages_cover_filtered_sequence(source in prop::collection::vec(arb_order(), 0..60), criteria in arb_criteria(), page_size in 1usize..15) {
        let filtered = filter::apply(&source, &criteria);
        let total = paginate::total_pages(filtered.len(), page_size);
        let mut joined = Vec::new();
        for page in 1..=total {
            joined.extend(paginate(&filtered, page, page_size).items);
        }
        prop_assert_eq!(joined, filtered);
    }
}
