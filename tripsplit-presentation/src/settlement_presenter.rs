use crate::{
    member_directory::{EmptyMemberDirectory, MemberDirectory, member_label},
    text_table::{Alignment, TextTableBuilder},
};
use std::{borrow::Cow, fmt};
use tripsplit_domain::{Debt, MemberBalances, Money, Settlement};

const MEMBER: &str = "Member";
const BALANCE: &str = "Balance";
const ALL_SETTLED: &str = "All settled";
const PAYMENT_CURRENCY: &str = "INR";

pub struct SettlementPresenter;

pub struct SettlementView {
    pub balance_table: String,
    /// One "X pays Y amount" line per debt, in settlement order.
    pub transfer_lines: Vec<String>,
    /// UPI deep link per transfer line; empty unless requested.
    pub payment_links: Vec<String>,
}

impl fmt::Display for SettlementView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Balances")?;
        write!(f, "{}", self.balance_table)?;
        writeln!(f)?;
        writeln!(f, "Settlements")?;
        if self.transfer_lines.is_empty() {
            return writeln!(f, "{ALL_SETTLED}");
        }
        for (idx, line) in self.transfer_lines.iter().enumerate() {
            match self.payment_links.get(idx) {
                Some(link) => writeln!(f, "{line}  {link}")?,
                None => writeln!(f, "{line}")?,
            }
        }
        Ok(())
    }
}

impl SettlementPresenter {
    pub fn render(settlement: &Settlement) -> SettlementView {
        Self::render_with_members(settlement, &EmptyMemberDirectory)
    }

    pub fn render_with_members(
        settlement: &Settlement,
        member_directory: &dyn MemberDirectory,
    ) -> SettlementView {
        SettlementView {
            balance_table: Self::build_balance_table(&settlement.balances, member_directory),
            transfer_lines: settlement
                .debts
                .iter()
                .map(|debt| Self::format_debt(debt, member_directory))
                .collect(),
            payment_links: Vec::new(),
        }
    }

    /// Like [`Self::render_with_members`], with a pay-now link beside each
    /// transfer.
    pub fn render_with_payment_links(
        settlement: &Settlement,
        member_directory: &dyn MemberDirectory,
        trip_name: &str,
    ) -> SettlementView {
        let mut view = Self::render_with_members(settlement, member_directory);
        view.payment_links = settlement
            .debts
            .iter()
            .map(|debt| Self::payment_link(debt, member_directory, trip_name))
            .collect();
        view
    }

    /// UPI intent for paying `debt.to`. The payee address is left blank for
    /// the payer's app to fill in.
    pub fn payment_link(
        debt: &Debt,
        member_directory: &dyn MemberDirectory,
        trip_name: &str,
    ) -> String {
        let payee = member_label(&debt.to, member_directory);
        let note = format!("Settlement for {trip_name}");
        format!(
            "upi://pay?pa=&pn={}&am={}&cu={PAYMENT_CURRENCY}&tn={}",
            urlencoding::encode(payee),
            format_amount(debt.amount),
            urlencoding::encode(&note)
        )
    }

    pub fn format_debt(debt: &Debt, member_directory: &dyn MemberDirectory) -> String {
        format!(
            "{} pays {} {}",
            member_label(&debt.from, member_directory),
            member_label(&debt.to, member_directory),
            format_amount(debt.amount)
        )
    }

    pub fn build_balance_table(
        balances: &MemberBalances,
        member_directory: &dyn MemberDirectory,
    ) -> String {
        let headers = [Cow::Borrowed(MEMBER), Cow::Borrowed(BALANCE)];
        let mut builder = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Right])
            .headers(&headers);

        for (member, balance) in balances {
            builder = builder.row([
                Cow::Borrowed(member_label(member, member_directory)),
                Cow::Owned(format_signed_amount(*balance)),
            ]);
        }

        builder.build()
    }
}

/// Rounds to cents and always prints two decimals.
pub fn format_amount(amount: Money) -> String {
    let rounded = amount.round_to_minor_units();
    // Avoid printing "-0.00" for residue that rounds away.
    let rounded = if rounded.is_zero() { Money::ZERO } else { rounded };
    format!("{rounded:.2}")
}

pub(crate) fn format_signed_amount(amount: Money) -> String {
    let formatted = format_amount(amount);
    if formatted.starts_with('-') {
        formatted
    } else {
        format!("+{formatted}")
    }
}
