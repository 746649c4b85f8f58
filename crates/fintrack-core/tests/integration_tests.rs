//! Integration tests for fintrack-core
//!
//! These tests exercise the full record → analytics → assistant workflow
//! against an in-memory store and a pinned clock.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use uuid::Uuid;

use fintrack_core::{
    AIClient, AnalyticsEngine, Budget, Category, ChatEvent, FixedClock, Goal, GoalContribution,
    GoalStatus, InsightAssistant, InsightKind, MemoryStore, MockBackend, PeriodKind, Projection,
    SessionState, Transaction, TransactionKind, Trend, Window,
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Helper holding a seeded store plus the ids tests need back
struct Scenario {
    store: Arc<MemoryStore>,
    owner: Uuid,
    groceries: Uuid,
    dining: Uuid,
    salary: Uuid,
}

/// Seed three months of steady spending, a salary, a grocery budget, and an
/// in-progress vacation goal
fn seeded_scenario() -> Scenario {
    let store = Arc::new(MemoryStore::new());
    let owner = Uuid::new_v4();
    let groceries = Uuid::new_v4();
    let dining = Uuid::new_v4();
    let salary = Uuid::new_v4();

    for (id, name, kind) in [
        (groceries, "Groceries", TransactionKind::Expense),
        (dining, "Dining", TransactionKind::Expense),
        (salary, "Salary", TransactionKind::Income),
    ] {
        store.insert_category(Category {
            id,
            owner,
            name: name.into(),
            color: "#16a34a".into(),
            kind,
            is_default: true,
        });
    }

    // May, June, July 2026: groceries climbing, dining steady, salary fixed
    for (month, grocery_total) in [(5u32, 280.0), (6, 300.0), (7, 320.0)] {
        for (category, amount) in [(groceries, grocery_total / 2.0), (dining, 60.0)] {
            for day in [5, 18] {
                store.insert_transaction(Transaction {
                    id: Uuid::new_v4(),
                    owner,
                    category_id: category,
                    amount,
                    kind: TransactionKind::Expense,
                    occurred_at: ymd(2026, month, day),
                    payment_method: "card".into(),
                    receipt_url: None,
                });
            }
        }
        store.insert_transaction(Transaction {
            id: Uuid::new_v4(),
            owner,
            category_id: salary,
            amount: 2500.0,
            kind: TransactionKind::Income,
            occurred_at: ymd(2026, month, 1),
            payment_method: "transfer".into(),
            receipt_url: None,
        });
    }

    store.insert_budget(Budget {
        id: Uuid::new_v4(),
        owner,
        category_id: Some(groceries),
        amount: 400.0,
        period: PeriodKind::Monthly,
        start_date: ymd(2026, 1, 1),
        alert_threshold: 0.8,
    });

    let goal = Goal {
        id: Uuid::new_v4(),
        owner,
        name: "Vacation".into(),
        target_amount: 2000.0,
        deadline: ymd(2026, 12, 31),
        status: GoalStatus::Active,
        created_at: ymd(2026, 5, 1).and_hms_opt(0, 0, 0).unwrap().and_utc(),
    };
    store.insert_goal(goal.clone());
    for (amount, month, day) in [(600.0, 5u32, 15u32), (500.0, 6, 15), (-100.0, 7, 1)] {
        store.insert_contribution(GoalContribution {
            id: Uuid::new_v4(),
            goal_id: goal.id,
            amount,
            note: None,
            created_at: ymd(2026, month, day).and_hms_opt(12, 0, 0).unwrap().and_utc(),
        });
    }

    Scenario {
        store,
        owner,
        groceries,
        dining,
        salary,
    }
}

fn engine_at(scenario: &Scenario, today: NaiveDate) -> Arc<AnalyticsEngine> {
    Arc::new(AnalyticsEngine::new(
        scenario.store.clone(),
        Arc::new(FixedClock::from_date(today)),
    ))
}

// =============================================================================
// Analytics pipeline
// =============================================================================

#[test]
fn test_summary_over_report_window() {
    let scenario = seeded_scenario();
    let engine = engine_at(&scenario, ymd(2026, 8, 5));

    let july = Window::new(ymd(2026, 7, 1), ymd(2026, 8, 1)).unwrap();
    let summary = engine.compute_summary(scenario.owner, &july).unwrap();

    assert_eq!(summary.total_spent, 440.0);
    assert_eq!(summary.total_income, 2500.0);
    assert_eq!(summary.net_balance, 2060.0);
    assert_eq!(summary.comparison.previous_period_amount, 420.0);
    assert_eq!(summary.comparison.trend, Trend::Up);

    // Groceries outspent dining, and only expense categories appear
    assert_eq!(summary.top_categories.len(), 2);
    assert_eq!(summary.top_categories[0].category_id, scenario.groceries);
    assert_eq!(summary.top_categories[1].category_id, scenario.dining);
    assert!(summary
        .top_categories
        .iter()
        .all(|c| c.category_id != scenario.salary));
}

#[test]
fn test_budget_status_follows_period_spend() {
    let scenario = seeded_scenario();
    let engine = engine_at(&scenario, ymd(2026, 7, 20));

    let statuses = engine.evaluate_budgets(scenario.owner).unwrap();
    assert_eq!(statuses.len(), 1);

    // July groceries: 2 × 160 = 320 against a 400 budget
    let status = &statuses[0];
    assert_eq!(status.spent, 320.0);
    assert!((status.percentage - 0.8).abs() < 1e-9);
    assert!(status.is_near_limit);
    assert!(!status.is_over_budget);
    assert_eq!(status.remaining, 80.0);
}

#[test]
fn test_goal_progress_and_projection() {
    let scenario = seeded_scenario();
    let engine = engine_at(&scenario, ymd(2026, 8, 5));

    let progress = engine.track_goals(scenario.owner).unwrap();
    assert_eq!(progress.len(), 1);

    let p = &progress[0];
    assert_eq!(p.current_amount, 1000.0);
    assert!(!p.completion_recommended);
    // 1100 deposited over 96 days ≈ 11.46/day; 1000 remaining ≈ 88 days out
    match p.projection {
        Projection::Date(date) => {
            assert!(date > ymd(2026, 8, 5));
            assert!(date < ymd(2027, 1, 1));
        }
        Projection::Indeterminate => panic!("expected a projected date"),
    }
}

#[test]
fn test_forecast_from_three_completed_months() {
    let scenario = seeded_scenario();
    let engine = engine_at(&scenario, ymd(2026, 8, 5));

    let prediction = engine.forecast(scenario.owner, PeriodKind::Monthly).unwrap();
    assert_eq!(prediction.period, "September 2026");

    // Totals 400/420/440 weighted 1:2:3 → 426.67; steady history, high confidence
    assert!((prediction.predicted_amount - 426.666_666).abs() < 1e-3);
    assert!(prediction.confidence > 0.9);

    // Both expense categories present, groceries ahead of dining
    assert_eq!(prediction.breakdown.len(), 2);
    assert_eq!(prediction.breakdown[0].category_id, scenario.groceries);
}

// =============================================================================
// Assistant workflow
// =============================================================================

#[tokio::test]
async fn test_grounded_chat_turn_end_to_end() {
    let scenario = seeded_scenario();
    let engine = engine_at(&scenario, ymd(2026, 8, 5));
    let assistant = InsightAssistant::new(
        engine,
        AIClient::Mock(MockBackend::new().with_chunks(vec!["You're ", "on track."])),
    );

    let session = assistant.session(scenario.owner);
    let mut rx = session.submit("How is my spending trending?").await.unwrap();

    let mut content = String::new();
    let mut completed = None;
    while let Some(event) = rx.recv().await {
        match event {
            ChatEvent::Delta(delta) => content.push_str(&delta),
            ChatEvent::Completed(message) => completed = Some(message),
            other => panic!("unexpected event {:?}", other),
        }
    }

    assert_eq!(content, "You're on track.");
    assert_eq!(completed.unwrap().content, "You're on track.");
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.history().len(), 2);
}

#[tokio::test]
async fn test_cancel_mid_stream_keeps_session_usable() {
    let scenario = seeded_scenario();
    let engine = engine_at(&scenario, ymd(2026, 8, 5));
    let assistant = InsightAssistant::new(
        engine,
        AIClient::Mock(
            MockBackend::new()
                .with_chunks(vec!["a", "b", "c", "d", "e"])
                .with_chunk_delay(Duration::from_millis(20)),
        ),
    );

    let session = assistant.session(scenario.owner);
    let mut rx = session.submit("long question").await.unwrap();
    let _first = rx.recv().await.unwrap();
    session.cancel();

    let mut saw_cancelled = false;
    while let Some(event) = rx.recv().await {
        if matches!(event, ChatEvent::Cancelled) {
            saw_cancelled = true;
        }
    }
    assert!(saw_cancelled);
    assert_eq!(session.state(), SessionState::Idle);

    // The session accepts the next turn cleanly
    let rx = session.submit("follow-up").await.unwrap();
    let mut rx = rx;
    while rx.recv().await.is_some() {}
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test]
async fn test_insights_reflect_financial_state() {
    let scenario = seeded_scenario();

    // Push July groceries over budget
    scenario.store.insert_transaction(Transaction {
        id: Uuid::new_v4(),
        owner: scenario.owner,
        category_id: scenario.groceries,
        amount: 150.0,
        kind: TransactionKind::Expense,
        occurred_at: ymd(2026, 7, 25),
        payment_method: "card".into(),
        receipt_url: None,
    });

    let engine = engine_at(&scenario, ymd(2026, 7, 28));
    let assistant = InsightAssistant::new(engine, AIClient::mock());

    let insights = assistant.generate_insights(scenario.owner).unwrap();
    assert!(!insights.is_empty());

    // Over-budget grocery spend must produce a warning
    assert!(insights.iter().any(|i| i.kind == InsightKind::Warning));
    // Forecast history exists, so a prediction insight rides along
    assert!(insights.iter().any(|i| i.kind == InsightKind::Prediction));

    // Ranked: priorities never increase down the list
    let ranks: Vec<u8> = insights.iter().map(|i| i.priority.rank()).collect();
    assert!(ranks.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_quiet_account_gets_no_warnings() {
    let store = Arc::new(MemoryStore::new());
    let owner = Uuid::new_v4();

    let engine = Arc::new(AnalyticsEngine::new(
        store,
        Arc::new(FixedClock::from_date(ymd(2026, 8, 5))),
    ));
    let assistant = InsightAssistant::new(engine, AIClient::mock());

    let insights = assistant.generate_insights(owner).unwrap();
    assert!(insights
        .iter()
        .all(|i| matches!(i.kind, InsightKind::Tip | InsightKind::Prediction)));
}
