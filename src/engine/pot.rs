use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::engine::errors::EngineError;

/// Единый банк раздачи. Сайд-потов нет: все претенденты играют за весь банк.
///
/// Инвариант: `total == collected - paid_out`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pot {
    pub total: Chips,
    /// Сколько всего фишек внесено за раздачу.
    pub collected: Chips,
    /// Сколько уже выплачено.
    pub paid_out: Chips,
}

impl Pot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, amount: Chips) {
        self.total += amount;
        self.collected += amount;
    }

    /// Выплатить из банка. Больше, чем лежит, выплатить нельзя.
    pub fn pay(&mut self, amount: Chips) -> Result<Chips, EngineError> {
        self.total = self
            .total
            .checked_sub(amount)
            .ok_or(EngineError::Internal("pot paid out more than it holds"))?;
        self.paid_out += amount;
        Ok(amount)
    }

    pub fn is_empty(&self) -> bool {
        self.total.is_zero()
    }
}
