use crate::model::{Debt, MemberBalances, MemberId, Money};

/// Greedy debt reduction service
pub struct SettlementCalculator;

impl SettlementCalculator {
    /// Reduce balances to a list of directed payments
    ///
    /// Debtors are processed largest debt first and creditors largest credit
    /// first; each step pays `min(|debt|, credit)` from the current debtor to
    /// the current creditor. Ties keep the order of `balances`.
    ///
    /// # Arguments
    /// * `balances` - Net position per member (positive: is owed money)
    ///
    /// # Returns
    /// Transfers in emission order, each strictly larger than [`Money::EPSILON`]
    pub fn calculate(&self, balances: &MemberBalances) -> Vec<Debt> {
        let epsilon = Money::EPSILON;

        let mut debtors: Vec<(&MemberId, Money)> = balances
            .iter()
            .filter(|(_, balance)| **balance < -epsilon)
            .map(|(member, balance)| (member, *balance))
            .collect();
        let mut creditors: Vec<(&MemberId, Money)> = balances
            .iter()
            .filter(|(_, balance)| **balance > epsilon)
            .map(|(member, balance)| (member, *balance))
            .collect();

        debtors.sort_by(|(_, a), (_, b)| a.cmp(b));
        creditors.sort_by(|(_, a), (_, b)| b.cmp(a));

        let mut debts = Vec::with_capacity((debtors.len() + creditors.len()).saturating_sub(1));
        let (mut i, mut j) = (0, 0);

        while i < debtors.len() && j < creditors.len() {
            let (debtor, debt) = &mut debtors[i];
            let (creditor, credit) = &mut creditors[j];

            let amount = debt.abs().min(*credit);
            if amount > epsilon {
                debts.push(Debt {
                    from: (*debtor).clone(),
                    to: (*creditor).clone(),
                    amount,
                });
            }

            *debt += amount;
            *credit -= amount;

            if debt.is_negligible() {
                i += 1;
            }
            if *credit < epsilon {
                j += 1;
            }
        }

        tracing::debug!(
            member_count = balances.len(),
            debtor_count = debtors.len(),
            creditor_count = creditors.len(),
            debt_count = debts.len(),
            "Settlement calculated"
        );

        debts
    }
}
