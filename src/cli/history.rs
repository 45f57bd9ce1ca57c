//! History command implementation

use crate::config::DatabaseConfig;
use crate::quote::StoredQuote;
use crate::store;
use clap::Args;

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Number of quotes to show
    #[arg(short, long, default_value = "10")]
    pub limit: u32,
}

impl HistoryArgs {
    /// Read the total and the newest quotes without touching the schema
    ///
    /// A missing database or table reads as zero quotes.
    pub async fn fetch(&self, config: &DatabaseConfig) -> anyhow::Result<(i64, Vec<StoredQuote>)> {
        let Some(store) = store::open_existing(config)? else {
            return Ok((0, Vec::new()));
        };

        let result = if store.has_table().await? {
            (store.count().await?, store.recent(self.limit).await?)
        } else {
            (0, Vec::new())
        };
        store.close().await;

        Ok(result)
    }

    pub async fn execute(&self, config: &DatabaseConfig) -> anyhow::Result<()> {
        let (total, quotes) = self.fetch(config).await?;

        println!("{} quotes stored, showing {}", total, quotes.len());
        for stored in quotes {
            println!(
                "  #{:<6} {}  {} {}/{}",
                stored.id,
                stored.timestamp.format("%Y-%m-%d %H:%M:%S%.3f UTC"),
                stored.quote.amount,
                stored.quote.base,
                stored.quote.currency
            );
        }

        Ok(())
    }
}
