use crate::settlement_presenter::format_amount;
use tripsplit_domain::{MAX_EXPENSE_AMOUNT, TripValidationError};

/// Error message followed by a hint on how to fix the trip data.
pub fn format_validation_error(error: &TripValidationError) -> String {
    let hint = match error {
        TripValidationError::DuplicateMember { .. } => {
            "Member ids must be unique within a trip.".to_string()
        }
        TripValidationError::NonPositiveAmount { .. } => {
            "Expense amounts must be greater than zero.".to_string()
        }
        TripValidationError::AmountTooLarge { .. } => {
            format!("A single expense may not exceed {MAX_EXPENSE_AMOUNT}.")
        }
        TripValidationError::UnknownPayer { .. }
        | TripValidationError::UnknownParticipant { .. } => {
            "Add the member to the trip or remove them from the expense.".to_string()
        }
        TripValidationError::EmptyParticipants { .. }
        | TripValidationError::EmptyShares { .. } => {
            "Select at least one member to split with.".to_string()
        }
        TripValidationError::DuplicateParticipant { .. } => {
            "List each participant once.".to_string()
        }
        TripValidationError::NegativeShare { .. } => "Shares cannot be negative.".to_string(),
        TripValidationError::SplitMismatch {
            amount,
            split_total,
            ..
        } => format!(
            "Exact shares must add up to the amount; they are off by {}.",
            format_amount((*amount - *split_total).abs())
        ),
    };
    format!("{error}. {hint}")
}
