use crate::error::{Result, VendingError};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// US coin denominations accepted and dispensed by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coin {
    Quarter,
    Dime,
    Nickel,
    Penny,
}

impl Coin {
    /// Denominations in the order the greedy algorithm tries them.
    pub const LARGEST_FIRST: [Coin; 4] = [Coin::Quarter, Coin::Dime, Coin::Nickel, Coin::Penny];

    pub fn cents(self) -> u32 {
        match self {
            Coin::Quarter => 25,
            Coin::Dime => 10,
            Coin::Nickel => 5,
            Coin::Penny => 1,
        }
    }

    /// Face value as a two-digit decimal amount, e.g. `0.25`.
    pub fn value(self) -> Decimal {
        Decimal::new(i64::from(self.cents()), 2)
    }
}

/// A coin-count vector representing a monetary amount.
///
/// Breakdowns built by [`ChangeBreakdown::from_cents`] always use the fewest
/// coins possible. Breakdowns built by [`ChangeBreakdown::combine`] represent
/// pooled physical coins and are not re-minimized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChangeBreakdown {
    pub quarters: u32,
    pub dimes: u32,
    pub nickels: u32,
    pub pennies: u32,
}

impl ChangeBreakdown {
    pub const ZERO: Self = Self {
        quarters: 0,
        dimes: 0,
        nickels: 0,
        pennies: 0,
    };

    pub fn new(quarters: u32, dimes: u32, nickels: u32, pennies: u32) -> Self {
        Self {
            quarters,
            dimes,
            nickels,
            pennies,
        }
    }

    /// Greedy largest-first decomposition of a cent amount.
    ///
    /// {25, 10, 5, 1} is a canonical coin system, so the result is unique and
    /// minimal in coin count.
    pub fn from_cents(cents: u32) -> Self {
        let mut remaining = cents;
        let mut change = Self::ZERO;
        for coin in Coin::LARGEST_FIRST {
            *change.count_mut(coin) = remaining / coin.cents();
            remaining %= coin.cents();
        }
        change
    }

    /// Converts a decimal amount to the nearest whole cent and decomposes it.
    ///
    /// Negative amounts are a caller contract violation and fail with
    /// [`VendingError::InvalidArgument`].
    pub fn from_monetary_amount(amount: Decimal) -> Result<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(VendingError::InvalidArgument(format!(
                "cannot make change for a negative amount: {amount}"
            )));
        }
        let cents = (amount * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .ok_or_else(|| {
                VendingError::InvalidArgument(format!("amount out of range: {amount}"))
            })?;
        Ok(Self::from_cents(cents))
    }

    /// Sums `count * face value` per denomination, each term fixed to two
    /// fractional digits.
    pub fn to_monetary_amount(&self) -> Decimal {
        Coin::LARGEST_FIRST
            .into_iter()
            .map(|coin| {
                let mut term = Decimal::from(self.count(coin)) * coin.value();
                term.rescale(2);
                term
            })
            .sum()
    }

    /// Component-wise sum of two breakdowns.
    ///
    /// Fails with [`VendingError::InvalidArgument`] when a coin count would
    /// overflow.
    pub fn combine(self, other: Self) -> Result<Self> {
        let sum = |a: u32, b: u32, coin: Coin| {
            a.checked_add(b).ok_or_else(|| {
                VendingError::InvalidArgument(format!("too many {coin:?} coins: {a} + {b}"))
            })
        };
        Ok(Self {
            quarters: sum(self.quarters, other.quarters, Coin::Quarter)?,
            dimes: sum(self.dimes, other.dimes, Coin::Dime)?,
            nickels: sum(self.nickels, other.nickels, Coin::Nickel)?,
            pennies: sum(self.pennies, other.pennies, Coin::Penny)?,
        })
    }

    pub fn count(&self, coin: Coin) -> u32 {
        match coin {
            Coin::Quarter => self.quarters,
            Coin::Dime => self.dimes,
            Coin::Nickel => self.nickels,
            Coin::Penny => self.pennies,
        }
    }

    fn count_mut(&mut self, coin: Coin) -> &mut u32 {
        match coin {
            Coin::Quarter => &mut self.quarters,
            Coin::Dime => &mut self.dimes,
            Coin::Nickel => &mut self.nickels,
            Coin::Penny => &mut self.pennies,
        }
    }

    pub fn coin_count(&self) -> u64 {
        Coin::LARGEST_FIRST
            .into_iter()
            .map(|coin| u64::from(self.count(coin)))
            .sum()
    }

    pub fn cents(&self) -> u64 {
        Coin::LARGEST_FIRST
            .into_iter()
            .map(|coin| u64::from(self.count(coin)) * u64::from(coin.cents()))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::ZERO
    }
}
