// src/export/arrow.rs

use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, BooleanArray, Date32Array, Float64Array, StringArray},
    datatypes::{DataType, Field as ArrowField, Schema as ArrowSchema},
    record_batch::RecordBatch,
};
use chrono::Datelike;
use std::sync::Arc;

use super::OUTPUT_COLUMNS;
use crate::compile::ConsolidatedDataset;
use crate::process::Period;

/// Arrow type of each output column, in `OUTPUT_COLUMNS` order.
///
/// - subject            → Utf8 (never null)
/// - *_deaths           → Float64
/// - period             → Date32 (first of the month)
/// - codes / names      → Utf8
/// - is_summary_row     → Boolean
fn column_type(name: &str) -> DataType {
    match name {
        "total_deaths" | "confirmed_covid_deaths" | "possible_covid_deaths" => DataType::Float64,
        "period" => DataType::Date32,
        "is_summary_row" => DataType::Boolean,
        _ => DataType::Utf8,
    }
}

pub fn dataset_schema() -> Arc<ArrowSchema> {
    let fields: Vec<ArrowField> = OUTPUT_COLUMNS
        .iter()
        .map(|name| {
            let nullable = !matches!(*name, "subject" | "period");
            ArrowField::new(*name, column_type(name), nullable)
        })
        .collect();
    Arc::new(ArrowSchema::new(fields))
}

/// Days from 0001-01-01 (CE) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn days_since_epoch(period: Period) -> i32 {
    period.first_day().num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// One batch holding the whole dataset.
pub fn build_record_batch(dataset: &ConsolidatedDataset) -> Result<RecordBatch> {
    let rows = dataset.rows();
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(|r| r.subject.as_str()),
        )),
        Arc::new(Float64Array::from_iter(rows.iter().map(|r| r.total_deaths))),
        Arc::new(Float64Array::from_iter(
            rows.iter().map(|r| r.confirmed_covid_deaths),
        )),
        Arc::new(Float64Array::from_iter(
            rows.iter().map(|r| r.possible_covid_deaths),
        )),
        Arc::new(Date32Array::from_iter_values(
            rows.iter().map(|r| days_since_epoch(r.period)),
        )),
        Arc::new(StringArray::from_iter(
            rows.iter().map(|r| r.region_code.as_deref()),
        )),
        Arc::new(StringArray::from_iter(
            rows.iter().map(|r| r.district_code.as_deref()),
        )),
        Arc::new(StringArray::from_iter(
            rows.iter().map(|r| r.district_name.as_deref()),
        )),
        Arc::new(BooleanArray::from_iter(
            rows.iter().map(|r| r.is_summary_row),
        )),
    ];

    RecordBatch::try_new(dataset_schema(), columns).context("building dataset record batch")
}
