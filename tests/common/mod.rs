use std::fs::File;
use std::io::Error;
use std::path::Path;

pub const HEADER: [&str; 8] = [
    "op",
    "buyer",
    "seller",
    "reference",
    "amount",
    "rate",
    "method",
    "outcome",
];

/// Generates a replay file where every seller receives `purchases` confirmed
/// card purchases of 100.00 at a 5% commission rate.
pub fn generate_purchase_csv(path: &Path, sellers: usize, purchases: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(HEADER)?;

    for s in 1..=sellers {
        for p in 1..=purchases {
            let seller = format!("s{s}");
            let reference = format!("order-{s}-{p}");
            wtr.write_record([
                "initiate",
                "b1",
                &seller,
                &reference,
                "100.00",
                "5",
                "card",
                "",
            ])?;
            wtr.write_record(["confirm", "", "", &reference, "", "", "", "success"])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
