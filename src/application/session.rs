use super::engine::VendingEngine;
use crate::domain::change::ChangeBreakdown;
use crate::error::Result;
use rust_decimal::Decimal;

/// A customer's visit to the machine: coins go in, items and change come out.
///
/// Inserted coins are pooled as-is. A successful purchase dispenses the change
/// and empties the balance; a rejected one leaves the balance untouched so the
/// customer can add coins or pick another slot.
pub struct VendingSession<'a> {
    engine: &'a VendingEngine,
    balance: ChangeBreakdown,
}

impl<'a> VendingSession<'a> {
    pub fn new(engine: &'a VendingEngine) -> Self {
        Self {
            engine,
            balance: ChangeBreakdown::ZERO,
        }
    }

    /// Adds coins to the balance. The balance is unchanged when a coin count
    /// would overflow.
    pub fn insert(&mut self, coins: ChangeBreakdown) -> Result<()> {
        self.balance = self.balance.combine(coins)?;
        Ok(())
    }

    pub fn balance(&self) -> Decimal {
        self.balance.to_monetary_amount()
    }

    pub fn coins(&self) -> ChangeBreakdown {
        self.balance
    }

    /// Buys the item at `slot_id` with the whole balance.
    ///
    /// The balance is kept on every error, including a `Persistence` error
    /// raised by the audit write after the sale was saved. In that case the
    /// item has been sold and the caller decides what to do with the balance.
    pub async fn purchase(&mut self, slot_id: &str) -> Result<ChangeBreakdown> {
        let change = self.engine.sell_item(slot_id, self.balance()).await?;
        self.balance = ChangeBreakdown::ZERO;
        Ok(change)
    }

    /// Returns the inserted coins unchanged.
    pub fn refund(&mut self) -> ChangeBreakdown {
        std::mem::take(&mut self.balance)
    }
}
