#![warn(clippy::uninlined_format_args)]

pub mod model;
pub mod services;

pub use model::{
    CategoryParseError, Debt, ExactShares, Expense, ExpenseCategory, ExpenseId, Member,
    MemberBalances, MemberId, Money, Settlement, Split, Trip,
};
pub use services::{
    BalanceCalculator, MAX_EXPENSE_AMOUNT, MemberLedger, MemberLedgers, MemberSpending,
    SettlementCalculator, SettlementEngine, TripSummary, TripSummaryCalculator,
    TripValidationError, TripValidator, ValidationMode, compute_settlement,
};
