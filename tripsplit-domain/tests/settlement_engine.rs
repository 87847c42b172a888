use rstest::{fixture, rstest};
use rust_decimal::Decimal;
use tripsplit_domain::{
    BalanceCalculator, Debt, Expense, Member, MemberId, Money, SettlementEngine, Trip,
    TripValidationError, ValidationMode, compute_settlement,
};

#[fixture]
fn members() -> Vec<Member> {
    vec![
        Member::new("A", "Aarav"),
        Member::new("B", "Bea"),
        Member::new("C", "Chidi"),
    ]
}

fn debt(from: &str, to: &str, amount: Money) -> Debt {
    Debt {
        from: MemberId::from(from),
        to: MemberId::from(to),
        amount,
    }
}

#[rstest]
#[case::single_expense_equal_split(
    vec![Expense::equal("e1", Money::from_i64(300), "A", ["A", "B", "C"])],
    vec![debt("B", "A", Money::from_i64(100)), debt("C", "A", Money::from_i64(100))],
)]
#[case::exact_split(
    vec![Expense::exact(
        "e1",
        Money::from_i64(100),
        "A",
        [("A", Money::from_i64(30)), ("B", Money::from_i64(70))],
    )],
    vec![debt("B", "A", Money::from_i64(70))],
)]
#[case::already_balanced(
    vec![
        Expense::equal("e1", Money::from_i64(120), "A", ["A", "B"]),
        Expense::equal("e2", Money::from_i64(120), "B", ["A", "B"]),
    ],
    vec![],
)]
#[case::no_expenses(vec![], vec![])]
#[case::chain_collapses(
    vec![
        Expense::equal("e1", Money::from_i64(100), "A", ["B"]),
        Expense::equal("e2", Money::from_i64(100), "B", ["C"]),
    ],
    vec![debt("C", "A", Money::from_i64(100))],
)]
#[case::thirds_stay_within_a_cent(
    vec![Expense::equal("e1", Money::from_i64(100), "A", ["A", "B", "C"])],
    vec![
        debt("C", "A", Money::new(33_333_333_333_334, 12)),
        debt("B", "A", Money::new(33_333_333_333_333, 12)),
    ],
)]
fn settles_trip(
    members: Vec<Member>,
    #[case] expenses: Vec<Expense>,
    #[case] expected: Vec<Debt>,
) {
    let trip = Trip::new(members, expenses);
    assert_eq!(compute_settlement(&trip), expected);
}

#[rstest]
fn empty_participant_list_leaves_credit_unmatched(members: Vec<Member>) {
    let trip = Trip::new(
        members,
        vec![
            Expense::equal("e1", Money::from_i64(90), "A", Vec::<&str>::new()),
            Expense::equal("e2", Money::from_i64(60), "B", ["B", "C"]),
        ],
    );

    let balances = BalanceCalculator.calculate(&trip);
    assert_eq!(balances[&MemberId::from("A")], Money::from_i64(90));

    let debts = compute_settlement(&trip);
    assert_eq!(debts, vec![debt("C", "A", Money::from_i64(30))]);
}

#[rstest]
fn strict_mode_reports_empty_participant_list(members: Vec<Member>) {
    let trip = Trip::new(
        members,
        vec![Expense::equal("e1", Money::from_i64(90), "A", Vec::<&str>::new())],
    );

    let result = SettlementEngine::new(ValidationMode::Strict).settle(&trip);
    assert!(matches!(
        result,
        Err(TripValidationError::EmptyParticipants { .. })
    ));
}

#[rstest]
fn exact_mismatch_is_not_renormalized(members: Vec<Member>) {
    let trip = Trip::new(
        members,
        vec![Expense::exact(
            "e1",
            Money::from_i64(100),
            "A",
            [("B", Money::from_i64(30)), ("C", Money::from_i64(30))],
        )],
    );

    let lenient = SettlementEngine::lenient()
        .settle(&trip)
        .expect("lenient settle never fails");
    assert_eq!(
        lenient.debts,
        vec![
            debt("B", "A", Money::from_i64(30)),
            debt("C", "A", Money::from_i64(30)),
        ]
    );

    let strict = SettlementEngine::strict().settle(&trip);
    assert!(matches!(
        strict,
        Err(TripValidationError::SplitMismatch { split_total, .. })
            if split_total == Money::from_i64(60)
    ));
}

#[rstest]
fn input_trip_is_left_untouched(members: Vec<Member>) {
    let trip = Trip::new(
        members,
        vec![Expense::equal("e1", Money::from_i64(300), "A", ["A", "B", "C"])],
    );
    let snapshot = trip.clone();

    let first = compute_settlement(&trip);
    let second = compute_settlement(&trip);

    assert_eq!(trip, snapshot);
    assert_eq!(first, second);
}

#[test]
fn concurrent_calls_on_independent_snapshots() {
    let trips: Vec<Trip> = (1..=4)
        .map(|scale| {
            Trip::new(
                vec![Member::new("A", "Aarav"), Member::new("B", "Bea")],
                vec![Expense::equal("e1", Money::from_i64(100 * scale), "A", ["A", "B"])],
            )
        })
        .collect();

    let results: Vec<Vec<Debt>> = std::thread::scope(|scope| {
        let handles: Vec<_> = trips
            .iter()
            .map(|trip| scope.spawn(move || compute_settlement(trip)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("settlement thread panicked"))
            .collect()
    });

    for (scale, debts) in (1..=4).zip(results) {
        assert_eq!(debts, vec![debt("B", "A", Money::from_i64(50 * scale))]);
    }
}

#[test]
fn amounts_beyond_decimal_range_degrade_instead_of_panicking() {
    let max = Money::from_decimal(Decimal::MAX);
    let trip = Trip::new(
        vec![Member::new("A", "Aarav"), Member::new("B", "Bea")],
        vec![
            Expense::equal("e1", max, "A", ["B"]),
            Expense::equal("e2", max, "A", ["B"]),
        ],
    );

    assert_eq!(compute_settlement(&trip), vec![debt("B", "A", max)]);
    assert!(matches!(
        SettlementEngine::strict().settle(&trip),
        Err(TripValidationError::AmountTooLarge { .. })
    ));
}
