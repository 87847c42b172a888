use crate::{
    model::{Debt, Settlement, Trip},
    services::{
        BalanceCalculator, SettlementCalculator, TripValidationError, TripValidator,
        ValidationMode,
    },
};

/// Turns a trip snapshot into a settlement plan.
#[derive(Clone, Copy, Debug, Default)]
pub struct SettlementEngine {
    mode: ValidationMode,
}

impl SettlementEngine {
    pub fn new(mode: ValidationMode) -> Self {
        Self { mode }
    }

    pub fn lenient() -> Self {
        Self::new(ValidationMode::Lenient)
    }

    pub fn strict() -> Self {
        Self::new(ValidationMode::Strict)
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Computes balances and the debt list.
    ///
    /// Only [`ValidationMode::Strict`] can fail; lenient engines always
    /// return a settlement.
    pub fn settle(&self, trip: &Trip) -> Result<Settlement, TripValidationError> {
        if self.mode == ValidationMode::Strict {
            TripValidator.validate(trip)?;
        }

        let balances = BalanceCalculator.calculate(trip);
        let debts = SettlementCalculator.calculate(&balances);

        Ok(Settlement { balances, debts })
    }
}

/// Lenient settlement of `trip`.
pub fn compute_settlement(trip: &Trip) -> Vec<Debt> {
    let balances = BalanceCalculator.calculate(trip);
    SettlementCalculator.calculate(&balances)
}
