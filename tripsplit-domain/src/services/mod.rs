pub mod balance_calculator;
pub mod settlement_calculator;
pub mod settlement_engine;
pub mod trip_summary;
pub mod trip_validator;

pub use balance_calculator::{BalanceCalculator, MemberLedger, MemberLedgers};
pub use settlement_calculator::SettlementCalculator;
pub use settlement_engine::{SettlementEngine, compute_settlement};
pub use trip_summary::{MemberSpending, TripSummary, TripSummaryCalculator};
pub use trip_validator::{MAX_EXPENSE_AMOUNT, TripValidationError, TripValidator, ValidationMode};
