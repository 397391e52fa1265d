use chrono::{Datelike, Local};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "receiptbox",
    version,
    about = "Collects receipts into a month partitioned ledger"
)]
pub struct Config {
    /// Year entries are booked in, defaults to the current year
    #[arg(value_name = "YEAR")]
    pub year: Option<i32>,

    /// Book entries in the previous year
    #[arg(long, conflicts_with = "year")]
    pub previous_year: bool,

    /// Address to listen on
    #[arg(long, env = "RECEIPTBOX_LISTEN", default_value = "0.0.0.0:3885")]
    pub listen: SocketAddr,

    /// Ledger workbook, created on first run
    #[arg(long, env = "RECEIPTBOX_LEDGER", default_value = "receipts.json")]
    pub ledger: PathBuf,
}

impl Config {
    pub fn ambient_year(&self) -> i32 {
        self.ambient_year_at(Local::now().year())
    }

    fn ambient_year_at(&self, current: i32) -> i32 {
        match (self.year, self.previous_year) {
            (Some(year), _) => year,
            (None, true) => current - 1,
            (None, false) => current,
        }
    }
}
