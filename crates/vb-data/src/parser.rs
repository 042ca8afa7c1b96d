//! Content parsing into row records

use serde_json::{Number, Value};

use crate::format::DataFormat;
use crate::{DataError, Dataset, Record};

/// Parse a content snapshot into a dataset using the given format
pub fn parse(content: &str, format: DataFormat) -> Result<Dataset, DataError> {
    match format {
        DataFormat::Csv => parse_csv(content),
        DataFormat::Json => parse_json(content),
    }
}

/// Inferred value type for a CSV column
#[derive(Debug, Clone, Copy, PartialEq)]
enum ColumnType {
    Int,
    Float,
    Bool,
    Text,
}

fn parse_csv(content: &str) -> Result<Dataset, DataError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    // Get headers
    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();

    // Collect all rows as strings before inference
    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    // Detect column types over the whole column
    let types: Vec<ColumnType> = (0..headers.len())
        .map(|idx| detect_column_type(&rows, idx))
        .collect();

    let mut dataset = Vec::with_capacity(rows.len());
    for row in &rows {
        let mut record = Record::new();
        for (idx, name) in headers.iter().enumerate() {
            let raw = row.get(idx).map(String::as_str).unwrap_or("");
            record.insert(name.clone(), convert_value(raw, types[idx]));
        }
        dataset.push(record);
    }

    tracing::debug!(rows = dataset.len(), columns = headers.len(), "parsed csv content");
    Ok(dataset)
}

/// Detect column type from the column's values
fn detect_column_type(rows: &[Vec<String>], col_idx: usize) -> ColumnType {
    let mut is_int = true;
    let mut is_float = true;
    let mut is_bool = true;
    let mut saw_value = false;

    for row in rows {
        if let Some(value) = row.get(col_idx) {
            if value.is_empty() {
                continue;
            }
            saw_value = true;

            // Try parsing as integer
            if is_int && value.parse::<i64>().is_err() {
                is_int = false;
            }

            // Try parsing as float
            if is_float && value.parse::<f64>().is_err() {
                is_float = false;
            }

            // Booleans are the literal tokens only
            if is_bool && !matches!(value.as_str(), "true" | "false") {
                is_bool = false;
            }
        }
    }

    if !saw_value {
        ColumnType::Text
    } else if is_int {
        ColumnType::Int
    } else if is_float {
        ColumnType::Float
    } else if is_bool {
        ColumnType::Bool
    } else {
        ColumnType::Text
    }
}

/// Convert a raw cell into a value of the detected column type
fn convert_value(raw: &str, column_type: ColumnType) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }

    match column_type {
        ColumnType::Int => raw
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(raw.to_string())),
        ColumnType::Float => raw
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(raw.to_string())),
        ColumnType::Bool => Value::Bool(raw == "true"),
        ColumnType::Text => Value::String(raw.to_string()),
    }
}

fn parse_json(content: &str) -> Result<Dataset, DataError> {
    let value: Value = serde_json::from_str(content)?;

    let rows = match value {
        Value::Array(rows) => rows,
        other => {
            return Err(DataError::Shape(format!(
                "expected a top-level array, got {}",
                kind_name(&other)
            )))
        }
    };

    let mut dataset = Vec::with_capacity(rows.len());
    for (idx, row) in rows.into_iter().enumerate() {
        match row {
            Value::Object(record) => dataset.push(record),
            other => {
                return Err(DataError::Shape(format!(
                    "row {} is not an object, got {}",
                    idx,
                    kind_name(&other)
                )))
            }
        }
    }

    tracing::debug!(rows = dataset.len(), "parsed json content");
    Ok(dataset)
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
