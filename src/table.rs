// src/table.rs

use anyhow::{ensure, Context, Result};
use arrow::array::{ArrayRef, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// The concatenated result of a chunked load: one record batch plus the row
/// index each row carried in from its chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    batch: RecordBatch,
    index: Vec<u64>,
}

/// Row/column counts and header names, as printed by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableShape {
    pub rows: usize,
    pub columns: usize,
    pub column_names: Vec<String>,
}

impl Table {
    pub fn new(batch: RecordBatch, index: Vec<u64>) -> Result<Self> {
        ensure!(
            batch.num_rows() == index.len(),
            "row index has {} entries but batch has {} rows",
            index.len(),
            batch.num_rows()
        );
        Ok(Self { batch, index })
    }

    pub fn empty(schema: SchemaRef) -> Self {
        Self {
            batch: RecordBatch::new_empty(schema),
            index: Vec::new(),
        }
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.num_rows(), self.num_columns())
    }

    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().to_string())
            .collect()
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn row_index(&self) -> &[u64] {
        &self.index
    }

    pub fn into_parts(self) -> (RecordBatch, Vec<u64>) {
        (self.batch, self.index)
    }

    /// First `n` rows (fewer if the table is shorter). Shares buffers with `self`.
    pub fn head(&self, n: usize) -> Table {
        let n = n.min(self.num_rows());
        Table {
            batch: self.batch.slice(0, n),
            index: self.index[..n].to_vec(),
        }
    }

    pub fn describe_shape(&self) -> TableShape {
        TableShape {
            rows: self.num_rows(),
            columns: self.num_columns(),
            column_names: self.column_names(),
        }
    }

    /// The batch with the row index prepended as a leading `UInt64` column.
    fn with_index_column(&self) -> Result<RecordBatch> {
        let mut fields = vec![Arc::new(Field::new("", DataType::UInt64, false))];
        fields.extend(self.batch.schema().fields().iter().cloned());

        let mut columns: Vec<ArrayRef> = Vec::with_capacity(fields.len());
        columns.push(Arc::new(UInt64Array::from(self.index.clone())));
        columns.extend(self.batch.columns().iter().cloned());

        RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
            .context("building indexed batch for display")
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indexed = self.with_index_column().map_err(|_| fmt::Error)?;
        let rendered = pretty_format_batches(&[indexed]).map_err(|_| fmt::Error)?;
        write!(f, "{}", rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, StringArray};

    fn sample() -> Table {
        let schema = Arc::new(Schema::new(vec![
            Field::new("date", DataType::Utf8, true),
            Field::new("PM25", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["2014-01-01", "2014-01-02", "2014-01-03"])),
                Arc::new(Float64Array::from(vec![Some(12.5), None, Some(80.0)])),
            ],
        )
        .unwrap();
        Table::new(batch, vec![10, 11, 12]).unwrap()
    }

    #[test]
    fn test_shape_and_names() {
        let t = sample();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.column_names(), vec!["date", "PM25"]);
        assert_eq!(
            t.describe_shape(),
            TableShape {
                rows: 3,
                columns: 2,
                column_names: vec!["date".into(), "PM25".into()],
            }
        );
    }

    #[test]
    fn test_head_keeps_index_labels() {
        let t = sample();
        let h = t.head(2);
        assert_eq!(h.num_rows(), 2);
        assert_eq!(h.row_index(), &[10, 11]);
        assert_eq!(t.head(99).num_rows(), 3);
        assert_eq!(t.head(0).num_rows(), 0);
    }

    #[test]
    fn test_index_length_must_match() {
        let (batch, _) = sample().into_parts();
        assert!(Table::new(batch, vec![0]).is_err());
    }

    #[test]
    fn test_empty_table_keeps_columns() {
        let t = Table::empty(sample().schema());
        assert_eq!(t.shape(), (0, 2));
        assert!(t.row_index().is_empty());
    }

    #[test]
    fn test_display_includes_index_and_values() {
        let rendered = sample().to_string();
        assert!(rendered.contains("PM25"));
        assert!(rendered.contains("2014-01-02"));
        assert!(rendered.contains("12"));
        assert!(rendered.contains("80"));
    }

    #[test]
    fn test_shape_serializes_to_json() {
        let json = serde_json::to_string(&sample().describe_shape()).unwrap();
        assert_eq!(
            json,
            r#"{"rows":3,"columns":2,"column_names":["date","PM25"]}"#
        );
    }
}
