use crate::{
    model::{ExpenseCategory, MemberId, Money, Trip},
    services::BalanceCalculator,
};
use rust_decimal::Decimal;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberSpending {
    pub member: MemberId,
    pub paid: Money,
    pub share: Money,
    pub balance: Money,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TripSummary {
    pub total_spent: Money,
    /// Largest category first.
    pub category_totals: Vec<(ExpenseCategory, Money)>,
    /// In member order.
    pub members: Vec<MemberSpending>,
    /// Calendar days the trip spans, at least 1.
    pub duration_days: u32,
}

impl TripSummary {
    pub fn member(&self, id: &MemberId) -> Option<&MemberSpending> {
        self.members.iter().find(|spending| &spending.member == id)
    }

    /// Fraction of the trip total consumed by `id`; zero when nothing was spent.
    pub fn share_of_total(&self, id: &MemberId) -> Decimal {
        let Some(spending) = self.member(id) else {
            return Decimal::ZERO;
        };
        if self.total_spent.is_zero() {
            return Decimal::ZERO;
        }
        spending
            .share
            .as_decimal()
            .checked_div(self.total_spent.as_decimal())
            .unwrap_or(Decimal::ZERO)
    }

    /// Spending per trip day.
    pub fn daily_average(&self) -> Money {
        let days = Decimal::from(self.duration_days.max(1));
        Money::from_decimal(self.total_spent.as_decimal() / days)
    }
}

/// Aggregate spending figures for dashboards.
pub struct TripSummaryCalculator;

impl TripSummaryCalculator {
    /// Summary of a single-day trip.
    pub fn summarize(&self, trip: &Trip) -> TripSummary {
        self.summarize_over(trip, 1)
    }

    /// Summary of a trip spanning `duration_days`; zero counts as one day.
    pub fn summarize_over(&self, trip: &Trip, duration_days: u32) -> TripSummary {
        let total_spent = trip
            .expenses
            .iter()
            .fold(Money::ZERO, |total, expense| total.saturating_add(expense.amount));

        let mut category_totals: Vec<(ExpenseCategory, Money)> = Vec::new();
        for expense in &trip.expenses {
            match category_totals
                .iter_mut()
                .find(|(category, _)| *category == expense.category)
            {
                Some((_, total)) => *total = total.saturating_add(expense.amount),
                None => category_totals.push((expense.category, expense.amount)),
            }
        }
        category_totals.sort_by(|(_, a), (_, b)| b.cmp(a));

        let members = BalanceCalculator
            .ledgers(trip)
            .into_iter()
            .map(|(member, ledger)| MemberSpending {
                member,
                paid: ledger.paid,
                share: ledger.share,
                balance: ledger.balance(),
            })
            .collect();

        TripSummary {
            total_spent,
            category_totals,
            members,
            duration_days: duration_days.max(1),
        }
    }
}
