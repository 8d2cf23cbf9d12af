use crate::domain::transaction::PaymentMethod;
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    /// Start a purchase (buyer, seller?, reference, amount, rate, method).
    Initiate,
    /// Deliver a completion notification for a transaction (reference, outcome).
    Confirm,
    /// Request a payout (seller, amount, method).
    Payout,
    /// Resolve a seller's oldest open payout (seller, outcome).
    Resolve,
}

/// One line of the replay stream. Fields not used by an op stay empty.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Command {
    pub op: CommandType,
    pub buyer: Option<String>,
    pub seller: Option<String>,
    pub reference: Option<String>,
    pub amount: Option<Decimal>,
    pub rate: Option<Decimal>,
    pub method: Option<PaymentMethod>,
    pub outcome: Option<String>,
}

/// Reads replay commands from a CSV source.
///
/// Wraps `csv::Reader` and provides a lazy iterator over `Result<Command>`,
/// trimming whitespace and tolerating ragged records, so large replay files
/// stream without loading into memory.
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
            .map(|result| result.map_err(PaymentError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const HEADER: &str = "op, buyer, seller, reference, amount, rate, method, outcome";

    #[test]
    fn test_reader_initiate() {
        let data = format!("{HEADER}\ninitiate, b1, s1, course-9, 100.00, 5, card, ");
        let reader = CommandReader::new(data.as_bytes());
        let commands: Vec<Result<Command>> = reader.commands().collect();

        assert_eq!(commands.len(), 1);
        let cmd = commands[0].as_ref().unwrap();
        assert_eq!(cmd.op, CommandType::Initiate);
        assert_eq!(cmd.buyer.as_deref(), Some("b1"));
        assert_eq!(cmd.amount, Some(dec!(100.00)));
        assert_eq!(cmd.method, Some(PaymentMethod::Card));
        assert_eq!(cmd.outcome, None);
    }

    #[test]
    fn test_reader_confirm_and_resolve() {
        let data = format!(
            "{HEADER}\nconfirm, , , course-9, , , , success\nresolve, , s1, , , , , rejected"
        );
        let reader = CommandReader::new(data.as_bytes());
        let commands: Vec<Command> = reader.commands().map(|c| c.unwrap()).collect();

        assert_eq!(commands[0].op, CommandType::Confirm);
        assert_eq!(commands[0].outcome.as_deref(), Some("success"));
        assert_eq!(commands[1].op, CommandType::Resolve);
        assert_eq!(commands[1].seller.as_deref(), Some("s1"));
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = format!("{HEADER}\nteleport, b1, , , , , , ");
        let reader = CommandReader::new(data.as_bytes());
        let commands: Vec<Result<Command>> = reader.commands().collect();
        assert!(commands[0].is_err());
    }
}
