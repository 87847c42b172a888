use crate::model::{Expense, MemberBalances, MemberId, Money, Split, Trip};
use fxhash::FxBuildHasher;
use indexmap::IndexMap;

/// Amounts a member fronted and consumed across a trip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemberLedger {
    pub paid: Money,
    pub share: Money,
}

impl MemberLedger {
    /// Positive when the group owes the member.
    pub fn balance(&self) -> Money {
        self.paid - self.share
    }
}

pub type MemberLedgers = IndexMap<MemberId, MemberLedger, FxBuildHasher>;

/// Accumulates per-member positions from a trip's expenses.
///
/// References to members that are not part of the trip are skipped rather
/// than creating new entries; strict callers reject such trips up front via
/// [`TripValidator`](crate::services::TripValidator).
pub struct BalanceCalculator;

impl BalanceCalculator {
    pub fn ledgers(&self, trip: &Trip) -> MemberLedgers {
        let mut ledgers: MemberLedgers = trip
            .member_ids()
            .map(|id| (id.clone(), MemberLedger::default()))
            .collect();

        for expense in &trip.expenses {
            apply_expense(&mut ledgers, expense);
        }

        ledgers
    }

    pub fn calculate(&self, trip: &Trip) -> MemberBalances {
        self.ledgers(trip)
            .into_iter()
            .map(|(id, ledger)| (id, ledger.balance()))
            .collect()
    }
}

fn apply_expense(ledgers: &mut MemberLedgers, expense: &Expense) {
    let Some(updates) = stage_expense(ledgers, expense) else {
        tracing::warn!(
            expense_id = %expense.id,
            amount = %expense.amount,
            "Skipping expense whose totals leave the representable range"
        );
        return;
    };

    for (index, ledger) in updates {
        ledgers[index] = ledger;
    }
}

/// Computes the ledgers touched by `expense` without mutating `ledgers`.
/// Returns `None` if any running total or resulting balance would overflow.
fn stage_expense(
    ledgers: &MemberLedgers,
    expense: &Expense,
) -> Option<Vec<(usize, MemberLedger)>> {
    let mut staged = StagedExpense {
        ledgers,
        expense,
        updates: Vec::new(),
    };

    match ledgers.get_index_of(&expense.payer) {
        Some(index) => {
            let ledger = staged.entry(index);
            ledger.paid = ledger.paid.checked_add(expense.amount)?;
        }
        None => tracing::warn!(
            expense_id = %expense.id,
            member_id = %expense.payer,
            amount = %expense.amount,
            "Skipping credit for payer outside the trip"
        ),
    }

    match &expense.split {
        Split::Exact { shares } => {
            for (member, share) in shares {
                staged.charge(member, *share)?;
            }
        }
        Split::Equal { participants } if participants.is_empty() => {
            tracing::warn!(
                expense_id = %expense.id,
                amount = %expense.amount,
                "Equal split has no participants; payer credit left unmatched"
            );
        }
        Split::Equal { participants } => {
            let shares = expense.amount.split_even(participants.len());
            for (member, share) in participants.iter().zip(shares) {
                staged.charge(member, share)?;
            }
        }
    }

    // `MemberLedger::balance` relies on this subtraction staying in range.
    for (_, ledger) in &staged.updates {
        ledger.paid.checked_sub(ledger.share)?;
    }

    Some(staged.updates)
}

struct StagedExpense<'a> {
    ledgers: &'a MemberLedgers,
    expense: &'a Expense,
    updates: Vec<(usize, MemberLedger)>,
}

impl StagedExpense<'_> {
    fn entry(&mut self, index: usize) -> &mut MemberLedger {
        let pos = match self.updates.iter().position(|(staged, _)| *staged == index) {
            Some(pos) => pos,
            None => {
                self.updates.push((index, self.ledgers[index]));
                self.updates.len() - 1
            }
        };
        &mut self.updates[pos].1
    }

    fn charge(&mut self, member: &MemberId, amount: Money) -> Option<()> {
        match self.ledgers.get_index_of(member) {
            Some(index) => {
                let ledger = self.entry(index);
                ledger.share = ledger.share.checked_add(amount)?;
            }
            None => tracing::warn!(
                expense_id = %self.expense.id,
                member_id = %member,
                amount = %amount,
                "Skipping share for member outside the trip"
            ),
        }
        Some(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Expense, Member};
    use rstest::{fixture, rstest};
    use rust_decimal::Decimal;

    #[fixture]
    fn members() -> Vec<Member> {
        vec![
            Member::new("a", "Asha"),
            Member::new("b", "Bilal"),
            Member::new("c", "Chen"),
        ]
    }

    fn balance_of(balances: &MemberBalances, id: &str) -> Option<Money> {
        balances.get(&MemberId::from(id)).copied()
    }

    #[rstest]
    #[case::equal_split(
        vec![Expense::equal("e1", Money::from_i64(300), "a", ["a", "b", "c"])],
        &[("a", 200), ("b", -100), ("c", -100)],
    )]
    #[case::exact_split(
        vec![Expense::exact(
            "e1",
            Money::from_i64(100),
            "a",
            [("a", Money::from_i64(30)), ("b", Money::from_i64(70))],
        )],
        &[("a", 70), ("b", -70), ("c", 0)],
    )]
    #[case::payer_not_participating(
        vec![Expense::equal("e1", Money::from_i64(90), "c", ["a", "b"])],
        &[("a", -45), ("b", -45), ("c", 90)],
    )]
    #[case::empty_participants_leave_credit_unmatched(
        vec![Expense::equal("e1", Money::from_i64(50), "a", Vec::<&str>::new())],
        &[("a", 50), ("b", 0), ("c", 0)],
    )]
    #[case::exact_mismatch_absorbed_by_payer(
        vec![Expense::exact(
            "e1",
            Money::from_i64(100),
            "a",
            [("b", Money::from_i64(40)), ("c", Money::from_i64(40))],
        )],
        &[("a", 100), ("b", -40), ("c", -40)],
    )]
    #[case::offsetting_expenses(
        vec![
            Expense::equal("e1", Money::from_i64(80), "a", ["a", "b"]),
            Expense::equal("e2", Money::from_i64(80), "b", ["a", "b"]),
        ],
        &[("a", 0), ("b", 0), ("c", 0)],
    )]
    fn calculates_balances(
        members: Vec<Member>,
        #[case] expenses: Vec<Expense>,
        #[case] expected: &[(&str, i64)],
    ) {
        let trip = Trip::new(members, expenses);
        let balances = BalanceCalculator.calculate(&trip);

        for (id, amount) in expected {
            assert_eq!(balance_of(&balances, id), Some(Money::from_i64(*amount)));
        }
    }

    #[rstest]
    fn unknown_exact_member_is_ignored(members: Vec<Member>) {
        let trip = Trip::new(
            members,
            vec![Expense::exact(
                "e1",
                Money::from_i64(100),
                "a",
                [("b", Money::from_i64(60)), ("ghost", Money::from_i64(40))],
            )],
        );

        let balances = BalanceCalculator.calculate(&trip);

        assert_eq!(balances.len(), 3);
        assert_eq!(balance_of(&balances, "ghost"), None);
        assert_eq!(balance_of(&balances, "a"), Some(Money::from_i64(100)));
        assert_eq!(balance_of(&balances, "b"), Some(Money::from_i64(-60)));
    }

    #[rstest]
    fn unknown_payer_gets_no_credit(members: Vec<Member>) {
        let trip = Trip::new(
            members,
            vec![Expense::equal("e1", Money::from_i64(60), "ghost", ["a", "b"])],
        );

        let balances = BalanceCalculator.calculate(&trip);

        assert_eq!(balance_of(&balances, "ghost"), None);
        assert_eq!(balance_of(&balances, "a"), Some(Money::from_i64(-30)));
        assert_eq!(balance_of(&balances, "b"), Some(Money::from_i64(-30)));
    }

    #[rstest]
    fn unknown_equal_participant_keeps_per_head_share(members: Vec<Member>) {
        let trip = Trip::new(
            members,
            vec![Expense::equal("e1", Money::from_i64(90), "a", ["a", "b", "ghost"])],
        );

        let balances = BalanceCalculator.calculate(&trip);

        assert_eq!(balance_of(&balances, "a"), Some(Money::from_i64(60)));
        assert_eq!(balance_of(&balances, "b"), Some(Money::from_i64(-30)));
        assert_eq!(balances.len(), 3);
    }

    #[rstest]
    fn balances_follow_member_order(members: Vec<Member>) {
        let trip = Trip::new(members, Vec::new());
        let balances = BalanceCalculator.calculate(&trip);
        let ids: Vec<&str> = balances.keys().map(MemberId::as_str).collect();

        assert_eq!(ids, ["a", "b", "c"]);
        assert!(balances.values().all(|balance| balance.is_zero()));
    }

    #[rstest]
    fn ledgers_split_paid_and_share(members: Vec<Member>) {
        let trip = Trip::new(
            members,
            vec![
                Expense::equal("e1", Money::from_i64(300), "a", ["a", "b", "c"]),
                Expense::equal("e2", Money::from_i64(60), "b", ["a", "b"]),
            ],
        );

        let ledgers = BalanceCalculator.ledgers(&trip);
        let a = ledgers[&MemberId::from("a")];
        let b = ledgers[&MemberId::from("b")];

        assert_eq!(a.paid, Money::from_i64(300));
        assert_eq!(a.share, Money::from_i64(130));
        assert_eq!(a.balance(), Money::from_i64(170));
        assert_eq!(b.paid, Money::from_i64(60));
        assert_eq!(b.share, Money::from_i64(130));
        assert_eq!(b.balance(), Money::from_i64(-70));
    }

    #[rstest]
    fn overflowing_expense_is_skipped(members: Vec<Member>) {
        let max = Money::from_decimal(Decimal::MAX);
        let trip = Trip::new(
            members,
            vec![
                Expense::equal("e1", max, "a", ["b"]),
                Expense::equal("e2", max, "a", ["b"]),
                Expense::equal("e3", Money::from_i64(30), "c", ["a", "c"]),
            ],
        );

        let ledgers = BalanceCalculator.ledgers(&trip);

        assert_eq!(ledgers[&MemberId::from("a")].paid, max);
        assert_eq!(ledgers[&MemberId::from("a")].share, Money::from_i64(15));
        assert_eq!(ledgers[&MemberId::from("b")].share, max);
        assert_eq!(ledgers[&MemberId::from("c")].balance(), Money::from_i64(15));
    }

    #[rstest]
    fn expense_with_unrepresentable_balance_is_skipped_whole(members: Vec<Member>) {
        let max = Money::from_decimal(Decimal::MAX);
        let trip = Trip::new(
            members,
            vec![
                Expense::equal("e1", max, "a", ["b"]),
                Expense::exact("e2", Money::from_i64(1), "b", [("a", -max)]),
            ],
        );

        let balances = BalanceCalculator.calculate(&trip);

        assert_eq!(balance_of(&balances, "a"), Some(max));
        assert_eq!(balance_of(&balances, "b"), Some(-max));
    }
}
