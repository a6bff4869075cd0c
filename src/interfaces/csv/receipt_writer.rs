use super::command_reader::Action;
use crate::domain::change::ChangeBreakdown;
use crate::domain::item::Item;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Serialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Rejected,
}

/// Outcome of one script command.
///
/// The coin columns hold the coins handed back to the customer; `balance` is
/// what remains in the machine afterwards.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct Receipt {
    pub action: Action,
    pub slot: String,
    pub status: Status,
    pub quarters: u32,
    pub dimes: u32,
    pub nickels: u32,
    pub pennies: u32,
    pub balance: Decimal,
    pub message: String,
}

impl Receipt {
    pub fn accepted(action: Action, slot: &str, returned: ChangeBreakdown, balance: Decimal) -> Self {
        Self {
            action,
            slot: slot.to_string(),
            status: Status::Ok,
            quarters: returned.quarters,
            dimes: returned.dimes,
            nickels: returned.nickels,
            pennies: returned.pennies,
            balance,
            message: String::new(),
        }
    }

    pub fn rejected(action: Action, slot: &str, balance: Decimal, message: String) -> Self {
        Self {
            status: Status::Rejected,
            message,
            ..Self::accepted(action, slot, ChangeBreakdown::ZERO, balance)
        }
    }
}

/// Writes receipts as CSV rows, header first.
pub struct ReceiptWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReceiptWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write(&mut self, receipt: &Receipt) -> Result<(), csv::Error> {
        self.writer.serialize(receipt)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[derive(Serialize)]
struct ItemRow<'a> {
    slot: &'a str,
    name: &'a str,
    quantity: u32,
    price: Decimal,
}

/// Writes an item listing as CSV: `slot,name,quantity,price`.
pub fn write_items<W: Write>(sink: W, items: &[Item]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(sink);
    if items.is_empty() {
        writer.write_record(["slot", "name", "quantity", "price"])?;
    }
    for item in items {
        writer.serialize(ItemRow {
            slot: &item.slot_id,
            name: &item.name,
            quantity: item.quantity_available,
            price: item.price,
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_receipt_rows() {
        let mut buf = Vec::new();
        {
            let mut writer = ReceiptWriter::new(&mut buf);
            writer
                .write(&Receipt::accepted(
                    Action::Purchase,
                    "A1",
                    ChangeBreakdown::new(2, 2, 0, 3),
                    dec!(0.00),
                ))
                .unwrap();
            writer
                .write(&Receipt::rejected(
                    Action::Purchase,
                    "B1",
                    dec!(1.00),
                    "Item at B1 is out of stock".to_string(),
                ))
                .unwrap();
            writer.flush().unwrap();
        }

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "action,slot,status,quarters,dimes,nickels,pennies,balance,message",
                "purchase,A1,ok,2,2,0,3,0.00,",
                "purchase,B1,rejected,0,0,0,0,1.00,Item at B1 is out of stock",
            ]
        );
    }

    #[test]
    fn test_item_listing() {
        let mut buf = Vec::new();
        write_items(
            &mut buf,
            &[
                Item::new("A1", "Chips", dec!(2.5), 5),
                Item::new("C1", "Candy", dec!(0.85), 2),
            ],
        )
        .unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "slot,name,quantity,price\nA1,Chips,5,2.50\nC1,Candy,2,0.85\n"
        );
    }

    #[test]
    fn test_empty_listing_has_header() {
        let mut buf = Vec::new();
        write_items(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "slot,name,quantity,price\n");
    }
}
