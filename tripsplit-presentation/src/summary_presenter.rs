use crate::{
    member_directory::{EmptyMemberDirectory, MemberDirectory, member_label},
    settlement_presenter::{format_amount, format_signed_amount},
    text_table::{Alignment, TextTableBuilder},
};
use rust_decimal::Decimal;
use std::{borrow::Cow, fmt::Write};
use tripsplit_domain::{Money, TripSummary};

const CATEGORY_HEADERS: [&str; 3] = ["Category", "Amount", "Share"];
const MEMBER_HEADERS: [&str; 4] = ["Member", "Paid", "Share", "Balance"];

pub struct SummaryPresenter;

impl SummaryPresenter {
    pub fn render(summary: &TripSummary) -> String {
        Self::render_with_members(summary, &EmptyMemberDirectory)
    }

    pub fn render_with_members(
        summary: &TripSummary,
        member_directory: &dyn MemberDirectory,
    ) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Total spent: {}", format_amount(summary.total_spent));
        let days = summary.duration_days;
        let unit = if days == 1 { "day" } else { "days" };
        let _ = writeln!(
            out,
            "Daily average: {} over {days} {unit}",
            format_amount(summary.daily_average())
        );

        if !summary.category_totals.is_empty() {
            out.push('\n');
            out.push_str(&Self::build_category_table(summary));
        }

        if !summary.members.is_empty() {
            out.push('\n');
            out.push_str(&Self::build_member_table(summary, member_directory));
        }

        out
    }

    pub fn build_category_table(summary: &TripSummary) -> String {
        let headers = CATEGORY_HEADERS.map(Cow::Borrowed);
        let mut builder = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Right, Alignment::Right])
            .headers(&headers);

        for (category, amount) in &summary.category_totals {
            builder = builder.row([
                Cow::Borrowed(category.label()),
                Cow::Owned(format_amount(*amount)),
                Cow::Owned(format_percent(*amount, summary.total_spent)),
            ]);
        }

        builder.build()
    }

    pub fn build_member_table(
        summary: &TripSummary,
        member_directory: &dyn MemberDirectory,
    ) -> String {
        let headers = MEMBER_HEADERS.map(Cow::Borrowed);
        let mut builder = TextTableBuilder::new()
            .alignments(&[
                Alignment::Left,
                Alignment::Right,
                Alignment::Right,
                Alignment::Right,
            ])
            .headers(&headers);

        for spending in &summary.members {
            builder = builder.row([
                Cow::Borrowed(member_label(&spending.member, member_directory)),
                Cow::Owned(format_amount(spending.paid)),
                Cow::Owned(format_amount(spending.share)),
                Cow::Owned(format_signed_amount(spending.balance)),
            ]);
        }

        builder.build()
    }
}

fn format_percent(part: Money, total: Money) -> String {
    if total.is_zero() {
        return "0.0%".to_string();
    }
    let percent = part
        .as_decimal()
        .checked_div(total.as_decimal())
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
        .round_dp(1);
    format!("{percent:.1}%")
}
