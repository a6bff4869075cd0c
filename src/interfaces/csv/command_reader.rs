use crate::domain::change::ChangeBreakdown;
use crate::error::{Result, VendingError};
use serde::{Deserialize, Serialize};
use std::io::Read;

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Insert,
    Purchase,
    Refund,
}

/// One row of a vending script: `action, slot, quarters, dimes, nickels, pennies`.
///
/// Columns that do not apply to the action may be left empty or omitted.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Command {
    pub action: Action,
    #[serde(default)]
    pub slot: Option<String>,
    #[serde(default)]
    pub quarters: Option<u32>,
    #[serde(default)]
    pub dimes: Option<u32>,
    #[serde(default)]
    pub nickels: Option<u32>,
    #[serde(default)]
    pub pennies: Option<u32>,
}

impl Command {
    pub fn coins(&self) -> ChangeBreakdown {
        ChangeBreakdown::new(
            self.quarters.unwrap_or_default(),
            self.dimes.unwrap_or_default(),
            self.nickels.unwrap_or_default(),
            self.pennies.unwrap_or_default(),
        )
    }
}

/// Reads vending commands from a CSV source.
///
/// Wraps `csv::Reader` with whitespace trimming and flexible record lengths,
/// yielding commands lazily.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(VendingError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_valid_stream() {
        let data = "action, slot, quarters, dimes, nickels, pennies\n\
                    insert, , 12, 2, 0, 3\n\
                    purchase, a1\n\
                    refund";
        let reader = CommandReader::new(data.as_bytes());
        let results: Vec<Result<Command>> = reader.commands().collect();

        assert_eq!(results.len(), 3);
        let insert = results[0].as_ref().unwrap();
        assert_eq!(insert.action, Action::Insert);
        assert_eq!(insert.slot, None);
        assert_eq!(insert.coins(), ChangeBreakdown::new(12, 2, 0, 3));

        let purchase = results[1].as_ref().unwrap();
        assert_eq!(purchase.action, Action::Purchase);
        assert_eq!(purchase.slot.as_deref(), Some("a1"));
        assert!(purchase.coins().is_empty());

        assert_eq!(results[2].as_ref().unwrap().action, Action::Refund);
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = "action, slot, quarters\ndance, A1, 1\ninsert, , many";
        let reader = CommandReader::new(data.as_bytes());
        let results: Vec<Result<Command>> = reader.commands().collect();

        assert!(matches!(results[0], Err(VendingError::Csv(_))));
        assert!(matches!(results[1], Err(VendingError::Csv(_))));
    }
}
