use api_types::{
    budget::{BudgetItemRecord, BudgetRecord},
    draw::{DrawRequestRecord, Processed},
    snapshot::Snapshot,
};
use engine::{Amount, BudgetId, BudgetItemId, DrawPolicy, DrawRequestId, EngineError, process};

fn budget(id: u64, balance_remaining: i64) -> BudgetRecord {
    BudgetRecord {
        budget_id: id,
        amount: balance_remaining.to_string(),
        balance_remaining: balance_remaining.to_string(),
    }
}

fn item(id: u64, budget_id: u64, funded_to_date: i64, original_amount: i64) -> BudgetItemRecord {
    BudgetItemRecord {
        budget_id,
        budget_item_id: id,
        funded_to_date: funded_to_date.to_string(),
        original_amount: original_amount.to_string(),
    }
}

fn draw(id: u64, budget_id: u64, item_id: u64, amount: i64, date: &str) -> DrawRequestRecord {
    DrawRequestRecord {
        draw_request_id: id,
        budget_id,
        budget_item_id: item_id,
        amount: amount.to_string(),
        effective_date: date.to_string(),
    }
}

fn sample() -> Snapshot {
    serde_json::from_str(include_str!("../../../fixtures/sample.json")).unwrap()
}

fn run(snapshot: Snapshot) -> Processed {
    process(snapshot, DrawPolicy::default()).unwrap().processed.into()
}

#[test]
fn drawable_requests_with_sufficient_budget_are_processed() {
    let result = run(Snapshot {
        budgets: vec![budget(1, 1000)],
        items: vec![item(1, 1, 250, 500), item(2, 1, 50, 100)],
        draw_requests: vec![
            draw(10, 1, 1, 250, "11/15/2015"),
            draw(20, 1, 2, 40, "11/20/2015"),
        ],
    });

    assert_eq!(result, Processed::from([(1, vec![10, 20])]));
}

#[test]
fn only_requests_within_item_capacity_are_processed() {
    let result = run(Snapshot {
        budgets: vec![budget(1, 1000)],
        items: vec![item(1, 1, 250, 500)],
        draw_requests: vec![
            draw(10, 1, 1, 350, "11/15/2015"),
            draw(20, 1, 1, 50, "11/20/2015"),
        ],
    });

    assert_eq!(result, Processed::from([(1, vec![20])]));
}

#[test]
fn budget_balance_does_not_gate_commits() {
    let settlement = process(
        Snapshot {
            budgets: vec![budget(1, 60)],
            items: vec![item(1, 1, 0, 50), item(2, 1, 0, 50)],
            draw_requests: vec![
                draw(10, 1, 1, 50, "11/15/2015"),
                draw(20, 1, 2, 40, "11/20/2015"),
            ],
        },
        DrawPolicy::ItemCapacity,
    )
    .unwrap();

    assert_eq!(
        settlement.processed.committed(BudgetId(1)),
        &[DrawRequestId(10), DrawRequestId(20)]
    );
    assert_eq!(settlement.budgets.balance(BudgetId(1)), Ok(Amount::new(-30)));
}

#[test]
fn two_items_under_one_budget_commit_in_date_order() {
    let result = run(Snapshot {
        budgets: vec![budget(1, 100)],
        items: vec![item(1, 1, 0, 50), item(2, 1, 0, 50)],
        draw_requests: vec![
            draw(20, 1, 2, 40, "11/20/2015"),
            draw(10, 1, 1, 50, "11/15/2015"),
        ],
    });

    assert_eq!(result, Processed::from([(1, vec![10, 20])]));
}

#[test]
fn request_over_item_capacity_is_skipped() {
    let settlement = process(
        Snapshot {
            budgets: vec![budget(1, 100)],
            items: vec![item(1, 1, 0, 50), item(2, 1, 20, 50)],
            draw_requests: vec![
                draw(10, 1, 1, 50, "11/15/2015"),
                draw(20, 1, 2, 40, "11/20/2015"),
            ],
        },
        DrawPolicy::ItemCapacity,
    )
    .unwrap();

    assert_eq!(settlement.processed.committed(BudgetId(1)), &[DrawRequestId(10)]);
    assert_eq!(settlement.skipped, vec![DrawRequestId(20)]);
}

#[test]
fn item_capacity_is_tracked_with_processed_requests() {
    let settlement = process(
        Snapshot {
            budgets: vec![budget(1, 1000)],
            items: vec![item(1, 1, 0, 500)],
            draw_requests: vec![
                draw(10, 1, 1, 100, "11/15/2015"),
                draw(20, 1, 1, 100, "11/20/2015"),
            ],
        },
        DrawPolicy::default(),
    )
    .unwrap();

    assert_eq!(settlement.items.capacity(BudgetItemId(1)), Ok(Amount::new(300)));
    assert_eq!(settlement.budgets.balance(BudgetId(1)), Ok(Amount::new(800)));
}

#[test]
fn results_are_mapped_by_budget_id() {
    let result = run(Snapshot {
        budgets: vec![budget(1, 1000), budget(2, 1000)],
        items: vec![
            item(1, 1, 250, 500),
            item(2, 1, 50, 100),
            item(3, 2, 200, 400),
            item(4, 2, 100, 200),
        ],
        draw_requests: vec![
            draw(10, 1, 1, 250, "11/15/2015"),
            draw(20, 1, 2, 40, "11/20/2015"),
            draw(30, 2, 3, 300, "11/20/2015"),
            draw(40, 2, 4, 50, "11/20/2015"),
        ],
    });

    assert_eq!(result, Processed::from([(1, vec![10, 20]), (2, vec![40])]));
}

#[test]
fn same_day_requests_keep_input_order() {
    let result = run(Snapshot {
        budgets: vec![budget(1, 1000)],
        items: vec![item(1, 1, 0, 100)],
        draw_requests: vec![
            draw(2, 1, 1, 60, "3/1/2021"),
            draw(1, 1, 1, 60, "3/1/2021"),
            draw(3, 1, 1, 40, "3/1/2021"),
        ],
    });

    assert_eq!(result, Processed::from([(1, vec![2, 3])]));
}

#[test]
fn over_funded_item_accepts_nothing() {
    let settlement = process(
        Snapshot {
            budgets: vec![budget(1, 1000)],
            items: vec![item(1, 1, 600, 500)],
            draw_requests: vec![draw(10, 1, 1, 0, "11/15/2015")],
        },
        DrawPolicy::default(),
    )
    .unwrap();

    assert!(settlement.processed.is_empty());
    assert_eq!(settlement.items.capacity(BudgetItemId(1)), Ok(Amount::new(-100)));
}

#[test]
fn committed_amounts_never_exceed_item_ceiling() {
    let snapshot = sample();
    let ceilings: Vec<(u64, i64)> = snapshot
        .items
        .iter()
        .map(|item| {
            let original: i64 = item.original_amount.parse().unwrap();
            let funded: i64 = item.funded_to_date.parse().unwrap();
            (item.budget_item_id, original - funded)
        })
        .collect();
    let requests = snapshot.draw_requests.clone();

    let settlement = process(snapshot, DrawPolicy::default()).unwrap();

    for (item_id, ceiling) in ceilings {
        let committed: i64 = requests
            .iter()
            .filter(|request| request.budget_item_id == item_id)
            .filter(|request| {
                settlement
                    .processed
                    .committed(BudgetId(request.budget_id))
                    .contains(&DrawRequestId(request.draw_request_id))
            })
            .map(|request| request.amount.parse::<i64>().unwrap())
            .sum();

        assert!(committed <= ceiling, "item {item_id}: {committed} > {ceiling}");
        assert_eq!(
            settlement.items.capacity(BudgetItemId(item_id)),
            Ok(Amount::new(ceiling - committed))
        );
    }
}

#[test]
fn sample_data_run() {
    let settlement = process(sample(), DrawPolicy::default()).unwrap();

    assert_eq!(
        Processed::from(settlement.processed),
        Processed::from([(1, vec![3, 6, 5, 2]), (2, vec![11, 13, 8, 10, 15])])
    );
    assert_eq!(settlement.skipped, [4, 1, 7, 12, 14, 9].map(DrawRequestId).to_vec());
    assert_eq!(settlement.budgets.balance(BudgetId(1)), Ok(Amount::new(6_000)));
    assert_eq!(settlement.budgets.balance(BudgetId(2)), Ok(Amount::new(1_500)));
}

#[test]
fn input_order_does_not_change_result() {
    let snapshot = sample();
    let mut reversed = snapshot.clone();
    reversed.draw_requests.reverse();
    // Requests 9 and 10 share a date, so keep their relative order.
    let nine = reversed
        .draw_requests
        .iter()
        .position(|request| request.draw_request_id == 9)
        .unwrap();
    let ten = reversed
        .draw_requests
        .iter()
        .position(|request| request.draw_request_id == 10)
        .unwrap();
    reversed.draw_requests.swap(nine, ten);

    assert_eq!(run(snapshot), run(reversed));
}

#[test]
fn malformed_date_fails_the_run() {
    let err = process(
        Snapshot {
            budgets: vec![budget(1, 1000)],
            items: vec![item(1, 1, 0, 500)],
            draw_requests: vec![
                draw(10, 1, 1, 100, "11/15/2015"),
                draw(20, 1, 1, 100, "11/31/2015"),
            ],
        },
        DrawPolicy::default(),
    )
    .unwrap_err();

    assert!(matches!(err, EngineError::InvalidDate(_)));
}

#[test]
fn non_numeric_amount_fails_the_run() {
    let mut snapshot = Snapshot {
        budgets: vec![budget(1, 1000)],
        items: vec![item(1, 1, 0, 500)],
        draw_requests: vec![draw(10, 1, 1, 100, "11/15/2015")],
    };
    snapshot.budgets[0].balance_remaining = "1000.00".to_string();

    let err = process(snapshot, DrawPolicy::default()).unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[test]
fn unknown_item_fails_the_run() {
    let err = process(
        Snapshot {
            budgets: vec![budget(1, 1000)],
            items: vec![item(1, 1, 0, 500)],
            draw_requests: vec![
                draw(10, 1, 1, 100, "11/15/2015"),
                draw(20, 1, 2, 100, "11/20/2015"),
            ],
        },
        DrawPolicy::default(),
    )
    .unwrap_err();

    assert_eq!(err, EngineError::KeyNotFound("budget item 2".to_string()));
}
