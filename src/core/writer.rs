//! Output serialization. JSON and CSV take values as they come; Parquet is
//! columnar, so a single type per column is inferred from the observed
//! values and irreconcilable mixes are rejected.

use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde_json::Value;

use crate::domain::model::{OutputFormat, RecordSet};
use crate::utils::error::{Result, TutorgenError};

/// Serialize a RecordSet into the requested format.
pub fn write_records(records: &RecordSet, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Json => to_json(records),
        OutputFormat::Csv => to_csv(records),
        OutputFormat::Parquet => to_parquet(records),
    }
}

/// Rows as a JSON array of objects. Row maps are already in schema order.
pub fn to_json(records: &RecordSet) -> Result<Vec<u8>> {
    let mut out = serde_json::to_vec_pretty(&records.rows)?;
    out.push(b'\n');
    Ok(out)
}

fn csv_value(value: &Value) -> Result<String> {
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // Nested values survive CSV as compact JSON text.
        other => serde_json::to_string(other)?,
    })
}

/// Header row = schema, one line per record, standard quoting via the csv
/// crate.
pub fn to_csv(records: &RecordSet) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&records.schema)?;

    for row in &records.rows {
        let mut line = Vec::with_capacity(records.schema.len());
        for field in &records.schema {
            line.push(csv_value(row.get(field).unwrap_or(&Value::Null))?);
        }
        writer.write_record(&line)?;
    }

    writer
        .into_inner()
        .map_err(|e| TutorgenError::Io(std::io::Error::other(e.to_string())))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnType {
    /// Only nulls seen so far.
    Unknown,
    Bool,
    Int,
    Float,
    Text,
}

impl ColumnType {
    fn name(&self) -> &'static str {
        match self {
            ColumnType::Unknown => "null",
            ColumnType::Bool => "boolean",
            ColumnType::Int => "integer",
            ColumnType::Float => "float",
            ColumnType::Text => "string",
        }
    }
}

fn classify(value: &Value) -> Option<ColumnType> {
    match value {
        Value::Null => Some(ColumnType::Unknown),
        Value::Bool(_) => Some(ColumnType::Bool),
        Value::Number(n) => {
            if n.as_i64().is_some() {
                Some(ColumnType::Int)
            } else {
                Some(ColumnType::Float)
            }
        }
        Value::String(_) => Some(ColumnType::Text),
        // Nested values have no columnar representation.
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn merge(a: ColumnType, b: ColumnType) -> Option<ColumnType> {
    use ColumnType::*;
    match (a, b) {
        (Unknown, x) | (x, Unknown) => Some(x),
        (x, y) if x == y => Some(x),
        (Int, Float) | (Float, Int) => Some(Float),
        _ => None,
    }
}

fn infer_column(records: &RecordSet, field: &str) -> Result<ColumnType> {
    let mut column = ColumnType::Unknown;
    for row in &records.rows {
        let value = row.get(field).unwrap_or(&Value::Null);
        let kind = classify(value).ok_or_else(|| TutorgenError::SchemaInference {
            column: field.to_string(),
            detail: "nested arrays/objects cannot be stored in a parquet column".to_string(),
        })?;
        column = merge(column, kind).ok_or_else(|| TutorgenError::SchemaInference {
            column: field.to_string(),
            detail: format!("mixed {} and {} values", column.name(), kind.name()),
        })?;
    }
    // An all-null column still needs a concrete type.
    Ok(if column == ColumnType::Unknown {
        ColumnType::Text
    } else {
        column
    })
}

fn build_array(records: &RecordSet, field: &str, column: ColumnType) -> ArrayRef {
    let values = records.rows.iter().map(|row| row.get(field));
    match column {
        ColumnType::Bool => Arc::new(BooleanArray::from(
            values.map(|v| v.and_then(Value::as_bool)).collect::<Vec<_>>(),
        )),
        ColumnType::Int => Arc::new(Int64Array::from(
            values.map(|v| v.and_then(Value::as_i64)).collect::<Vec<_>>(),
        )),
        ColumnType::Float => Arc::new(Float64Array::from(
            values.map(|v| v.and_then(Value::as_f64)).collect::<Vec<_>>(),
        )),
        ColumnType::Unknown | ColumnType::Text => Arc::new(StringArray::from(
            values.map(|v| v.and_then(Value::as_str)).collect::<Vec<_>>(),
        )),
    }
}

fn arrow_type(column: ColumnType) -> DataType {
    match column {
        ColumnType::Bool => DataType::Boolean,
        ColumnType::Int => DataType::Int64,
        ColumnType::Float => DataType::Float64,
        ColumnType::Unknown | ColumnType::Text => DataType::Utf8,
    }
}

/// Columnar table grouped by schema field, one inferred type per column.
pub fn to_parquet(records: &RecordSet) -> Result<Vec<u8>> {
    let mut fields = Vec::with_capacity(records.schema.len());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(records.schema.len());

    for name in &records.schema {
        let column = infer_column(records, name)?;
        fields.push(Field::new(name, arrow_type(column), true));
        columns.push(build_array(records, name, column));
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns)?;

    let mut buf = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buf, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn record_set(schema: &[&str], rows: Vec<Value>) -> RecordSet {
        let schema: Vec<String> = schema.iter().map(|s| s.to_string()).collect();
        let rows = rows
            .into_iter()
            .map(|v| {
                let obj = v.as_object().unwrap();
                let mut row = Map::new();
                for field in &schema {
                    row.insert(field.clone(), obj.get(field).cloned().unwrap_or(Value::Null));
                }
                row
            })
            .collect();
        RecordSet {
            schema,
            rows,
            dropped: 0,
        }
    }

    #[test]
    fn test_csv_header_and_row() {
        let records = record_set(&["name", "age"], vec![json!({"name":"A","age":30})]);
        let bytes = to_csv(&records).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "name,age\nA,30\n");
    }

    #[test]
    fn test_csv_quoting_of_embedded_commas() {
        let records = record_set(
            &["name", "city"],
            vec![json!({"name":"A","city":"Austin, TX"})],
        );
        let text = String::from_utf8(to_csv(&records).unwrap()).unwrap();
        assert!(text.contains("\"Austin, TX\""));
    }

    #[test]
    fn test_json_round_trip_preserves_rows_and_field_order() {
        let records = record_set(
            &["name", "age"],
            vec![json!({"name":"A","age":30}), json!({"name":"B","age":25})],
        );
        let bytes = to_json(&records).unwrap();
        let back: Vec<Map<String, Value>> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back, records.rows);
        let keys: Vec<&String> = back[0].keys().collect();
        assert_eq!(keys, ["name", "age"]);
    }

    #[test]
    fn test_parquet_round_trip_counts_and_types() {
        use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

        let records = record_set(
            &["name", "age", "score"],
            vec![
                json!({"name":"A","age":30,"score":1.5}),
                json!({"name":"B","age":25,"score":2}),
            ],
        );
        let bytes = to_parquet(&records).unwrap();

        let reader = ParquetRecordBatchReaderBuilder::try_new(bytes::Bytes::from(bytes))
            .unwrap()
            .build()
            .unwrap();
        let batches: Vec<RecordBatch> = reader.map(|b| b.unwrap()).collect();
        assert_eq!(batches.iter().map(|b| b.num_rows()).sum::<usize>(), 2);

        let schema = batches[0].schema();
        assert_eq!(schema.field(0).data_type(), &DataType::Utf8);
        assert_eq!(schema.field(1).data_type(), &DataType::Int64);
        // int mixed with float widens to float
        assert_eq!(schema.field(2).data_type(), &DataType::Float64);
    }

    #[test]
    fn test_parquet_rejects_irreconcilable_columns() {
        let records = record_set(
            &["payload"],
            vec![json!({"payload":"text"}), json!({"payload":{"nested":true}})],
        );
        let err = to_parquet(&records).unwrap_err();
        match err {
            TutorgenError::SchemaInference { column, .. } => assert_eq!(column, "payload"),
            other => panic!("expected SchemaInference, got {:?}", other),
        }
    }

    #[test]
    fn test_parquet_tolerates_nulls_in_typed_columns() {
        let records = record_set(
            &["name", "age"],
            vec![json!({"name":"A","age":30}), json!({"name":"B","age":null})],
        );
        assert!(to_parquet(&records).is_ok());
    }

    #[test]
    fn test_csv_renders_nested_values_as_compact_json() {
        let records = record_set(&["tags"], vec![json!({"tags":["a","b"]})]);
        let text = String::from_utf8(to_csv(&records).unwrap()).unwrap();
        assert!(text.contains("\"[\"\"a\"\",\"\"b\"\"]\""));
    }
}
