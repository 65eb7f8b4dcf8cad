use arrow::array::{Array, Float64Array};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ProjectionMask;
use parhist_common::{ParhistError, Result};
use std::path::Path;

const BATCH_SIZE: usize = 65536;

fn is_numeric(dt: &DataType) -> bool {
    matches!(
        dt,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float16
            | DataType::Float32
            | DataType::Float64
    )
}

/// Load one numeric column of a Parquet file as `f64`, skipping nulls.
pub fn read_float_column(path: &Path, column: &str) -> Result<Vec<f64>> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let idx = schema
        .fields()
        .iter()
        .position(|f| f.name() == column)
        .ok_or_else(|| {
            ParhistError::Other(format!("no column named {column} in {}", path.display()))
        })?;
    let field = schema.field(idx);
    if !is_numeric(field.data_type()) {
        return Err(ParhistError::Other(format!(
            "column {column} is {}, not numeric",
            field.data_type()
        )));
    }
    let mask = ProjectionMask::roots(builder.parquet_schema(), [idx]);
    let reader = builder
        .with_projection(mask)
        .with_batch_size(BATCH_SIZE)
        .build()?;

    let mut values = Vec::new();
    for batch in reader {
        let batch = batch?;
        let col = cast(batch.column(0), &DataType::Float64)?;
        let floats = col
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or_else(|| ParhistError::Other(format!("column {column} did not cast to f64")))?;
        values.extend(floats.iter().flatten());
    }
    Ok(values)
}
