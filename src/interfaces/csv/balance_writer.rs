use crate::domain::balance::SellerBalance;
use crate::error::Result;
use std::io::Write;

/// Writes final seller balances as CSV.
pub struct BalanceWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> BalanceWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_balances(&mut self, balances: Vec<SellerBalance>) -> Result<()> {
        self.writer.write_record([
            "seller",
            "available",
            "pending",
            "total_earned",
            "total_withdrawn",
        ])?;
        for balance in balances {
            self.writer.write_record([
                balance.seller_id.as_str(),
                &balance.available_balance.to_string(),
                &balance.pending_balance.to_string(),
                &balance.total_earned.to_string(),
                &balance.total_withdrawn.to_string(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
