use super::command_reader::{Action, Command, CommandReader};
use super::receipt_writer::{Receipt, ReceiptWriter};
use crate::application::engine::VendingEngine;
use crate::application::session::VendingSession;
use crate::error::{Result, VendingError};
use std::io::{Read, Write};
use tracing::warn;

/// Counts of what happened while running a script.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct ScriptSummary {
    pub accepted: usize,
    pub rejected: usize,
    pub unreadable: usize,
}

/// Runs a vending script through one [`VendingSession`], writing a receipt per
/// command.
///
/// Business rejections (unknown slot, out of stock, insufficient funds) are
/// reported and the script continues. Unreadable rows are skipped. Storage
/// failures abort the run. Coins still in the machine at the end are refunded
/// in a final receipt.
pub async fn run_script<R: Read, W: Write>(
    engine: &VendingEngine,
    source: R,
    sink: W,
) -> Result<ScriptSummary> {
    let mut session = VendingSession::new(engine);
    let mut writer = ReceiptWriter::new(sink);
    let mut summary = ScriptSummary::default();

    for command in CommandReader::new(source).commands() {
        let command = match command {
            Ok(command) => command,
            Err(e) => {
                warn!("Error reading command: {}", e);
                summary.unreadable += 1;
                continue;
            }
        };

        let receipt = match execute(&mut session, &command).await {
            Ok(receipt) => {
                summary.accepted += 1;
                receipt
            }
            Err(e @ VendingError::Persistence(_)) => return Err(e),
            Err(e) => {
                warn!("Rejected {:?} command: {}", command.action, e);
                summary.rejected += 1;
                Receipt::rejected(
                    command.action,
                    command.slot.as_deref().unwrap_or_default(),
                    session.balance(),
                    e.to_string(),
                )
            }
        };
        writer.write(&receipt)?;
    }

    if !session.coins().is_empty() {
        let returned = session.refund();
        writer.write(&Receipt::accepted(
            Action::Refund,
            "",
            returned,
            session.balance(),
        ))?;
    }

    writer.flush()?;
    Ok(summary)
}

async fn execute(session: &mut VendingSession<'_>, command: &Command) -> Result<Receipt> {
    match command.action {
        Action::Insert => {
            session.insert(command.coins())?;
            Ok(Receipt::accepted(
                Action::Insert,
                "",
                Default::default(),
                session.balance(),
            ))
        }
        Action::Purchase => {
            let slot = command.slot.as_deref().unwrap_or_default();
            if slot.is_empty() {
                return Err(VendingError::InvalidArgument(
                    "purchase requires a slot".to_string(),
                ));
            }
            let change = session.purchase(slot).await?;
            Ok(Receipt::accepted(
                Action::Purchase,
                &slot.to_uppercase(),
                change,
                session.balance(),
            ))
        }
        Action::Refund => {
            let returned = session.refund();
            Ok(Receipt::accepted(
                Action::Refund,
                "",
                returned,
                session.balance(),
            ))
        }
    }
}
