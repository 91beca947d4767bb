use anyhow::{Context, Result};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::{fs::File, path::Path};

use super::arrow::{build_record_batch, dataset_schema};
use crate::compile::ConsolidatedDataset;

/// Write the dataset as a single Snappy-compressed Parquet file, replacing any existing one.
pub fn write_parquet<P: AsRef<Path>>(dataset: &ConsolidatedDataset, path: P) -> Result<()> {
    let path = path.as_ref();
    let batch = build_record_batch(dataset)?;

    let file = File::create(path).with_context(|| format!("creating parquet file {:?}", path))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, dataset_schema(), Some(props))
        .context("creating Arrow writer for dataset")?;
    writer.write(&batch).context("writing dataset batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}
