use anyhow::Result;
use tracing::info;

use crate::compile::ConsolidatedDataset;
use crate::config::Config;

pub mod arrow;
pub mod parquet;
pub mod xlsx;

pub use self::arrow::{build_record_batch, dataset_schema};
pub use self::parquet::write_parquet;
pub use self::xlsx::write_xlsx;

/// Column order shared by every output format.
pub const OUTPUT_COLUMNS: [&str; 9] = [
    "subject",
    "total_deaths",
    "confirmed_covid_deaths",
    "possible_covid_deaths",
    "period",
    "region_code",
    "district_code",
    "district_name",
    "is_summary_row",
];

/// Write the spreadsheet and, when configured, the Parquet copy. Existing files are replaced.
pub fn export_all(dataset: &ConsolidatedDataset, config: &Config) -> Result<()> {
    write_xlsx(dataset, &config.output_xlsx)?;
    info!("consolidated file updated: {}", config.output_xlsx.display());

    if let Some(path) = &config.output_parquet {
        write_parquet(dataset, path)?;
        info!("parquet copy written: {}", path.display());
    }
    Ok(())
}
