use crate::model::{Expense, ExpenseId, MemberId, Money, Split, Trip};
use fxhash::FxHashSet;

/// Largest amount accepted for a single expense.
pub const MAX_EXPENSE_AMOUNT: i64 = 1_000_000;

/// How the engine treats inconsistent trip data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Skip unknown references, empty splits and share mismatches.
    #[default]
    Lenient,
    /// Reject the trip on the first inconsistency.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TripValidationError {
    #[error("Member {member} is listed more than once")]
    DuplicateMember { member: MemberId },
    #[error("Expense {expense} has non-positive amount {amount}")]
    NonPositiveAmount { expense: ExpenseId, amount: Money },
    #[error("Expense {expense} amount {amount} exceeds the limit of {limit}")]
    AmountTooLarge {
        expense: ExpenseId,
        amount: Money,
        limit: Money,
    },
    #[error("Expense {expense} is paid by unknown member {member}")]
    UnknownPayer { expense: ExpenseId, member: MemberId },
    #[error("Expense {expense} references unknown member {member}")]
    UnknownParticipant { expense: ExpenseId, member: MemberId },
    #[error("Expense {expense} is split equally among no one")]
    EmptyParticipants { expense: ExpenseId },
    #[error("Expense {expense} lists {member} more than once")]
    DuplicateParticipant { expense: ExpenseId, member: MemberId },
    #[error("Expense {expense} has no exact shares")]
    EmptyShares { expense: ExpenseId },
    #[error("Expense {expense} assigns a negative share {share} to {member}")]
    NegativeShare {
        expense: ExpenseId,
        member: MemberId,
        share: Money,
    },
    #[error("Expense {expense} shares sum to {split_total} but the amount is {amount}")]
    SplitMismatch {
        expense: ExpenseId,
        amount: Money,
        split_total: Money,
    },
}

/// Entry-level consistency checks applied in [`ValidationMode::Strict`].
pub struct TripValidator;

impl TripValidator {
    pub fn validate(&self, trip: &Trip) -> Result<(), TripValidationError> {
        let mut known: FxHashSet<&MemberId> = FxHashSet::default();
        for member in trip.member_ids() {
            if !known.insert(member) {
                return Err(TripValidationError::DuplicateMember {
                    member: member.clone(),
                });
            }
        }

        for expense in &trip.expenses {
            validate_expense(&known, expense)?;
        }

        Ok(())
    }
}

fn validate_expense(
    known: &FxHashSet<&MemberId>,
    expense: &Expense,
) -> Result<(), TripValidationError> {
    let amount = expense.amount;
    if amount <= Money::ZERO {
        return Err(TripValidationError::NonPositiveAmount {
            expense: expense.id.clone(),
            amount,
        });
    }

    let limit = Money::from_i64(MAX_EXPENSE_AMOUNT);
    if amount > limit {
        return Err(TripValidationError::AmountTooLarge {
            expense: expense.id.clone(),
            amount,
            limit,
        });
    }

    if !known.contains(&expense.payer) {
        return Err(TripValidationError::UnknownPayer {
            expense: expense.id.clone(),
            member: expense.payer.clone(),
        });
    }

    let unknown = |member: &MemberId| TripValidationError::UnknownParticipant {
        expense: expense.id.clone(),
        member: member.clone(),
    };

    match &expense.split {
        Split::Equal { participants } => {
            if participants.is_empty() {
                return Err(TripValidationError::EmptyParticipants {
                    expense: expense.id.clone(),
                });
            }

            let mut seen: FxHashSet<&MemberId> = FxHashSet::default();
            for member in participants {
                if !known.contains(member) {
                    return Err(unknown(member));
                }
                if !seen.insert(member) {
                    return Err(TripValidationError::DuplicateParticipant {
                        expense: expense.id.clone(),
                        member: member.clone(),
                    });
                }
            }
        }
        Split::Exact { shares } => {
            if shares.is_empty() {
                return Err(TripValidationError::EmptyShares {
                    expense: expense.id.clone(),
                });
            }

            for (member, share) in shares {
                if !known.contains(member) {
                    return Err(unknown(member));
                }
                if *share < Money::ZERO {
                    return Err(TripValidationError::NegativeShare {
                        expense: expense.id.clone(),
                        member: member.clone(),
                        share: *share,
                    });
                }
            }

            let split_total = shares
                .values()
                .fold(Money::ZERO, |total, share| total.saturating_add(*share));
            if (split_total - amount).abs() > Money::SPLIT_TOLERANCE {
                return Err(TripValidationError::SplitMismatch {
                    expense: expense.id.clone(),
                    amount,
                    split_total,
                });
            }
        }
    }

    Ok(())
}
