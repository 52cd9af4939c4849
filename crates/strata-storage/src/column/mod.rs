#[macro_use]
mod macros;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strata_common::error::{Error, Result};
use strata_common::types::{DataType, Value};

use crate::NullBitmap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Column {
    Bool {
        data: Vec<bool>,
        nulls: NullBitmap,
    },
    Int64 {
        data: Vec<i64>,
        nulls: NullBitmap,
    },
    Float64 {
        data: Vec<f64>,
        nulls: NullBitmap,
    },
    Numeric {
        data: Vec<Decimal>,
        nulls: NullBitmap,
    },
    String {
        data: Vec<String>,
        nulls: NullBitmap,
    },
    Bytes {
        data: Vec<Vec<u8>>,
        nulls: NullBitmap,
    },
    Date {
        data: Vec<NaiveDate>,
        nulls: NullBitmap,
    },
    Timestamp {
        data: Vec<DateTime<Utc>>,
        nulls: NullBitmap,
    },
}

impl Column {
    pub fn new(data_type: &DataType) -> Self {
        Self::with_capacity(data_type, 0)
    }

    pub fn with_capacity(data_type: &DataType, capacity: usize) -> Self {
        let nulls = NullBitmap::with_capacity(capacity);
        match data_type {
            DataType::Bool => Column::Bool {
                data: Vec::with_capacity(capacity),
                nulls,
            },
            DataType::Int64 => Column::Int64 {
                data: Vec::with_capacity(capacity),
                nulls,
            },
            DataType::Float64 => Column::Float64 {
                data: Vec::with_capacity(capacity),
                nulls,
            },
            DataType::Numeric => Column::Numeric {
                data: Vec::with_capacity(capacity),
                nulls,
            },
            DataType::String | DataType::Unknown => Column::String {
                data: Vec::with_capacity(capacity),
                nulls,
            },
            DataType::Bytes => Column::Bytes {
                data: Vec::with_capacity(capacity),
                nulls,
            },
            DataType::Date => Column::Date {
                data: Vec::with_capacity(capacity),
                nulls,
            },
            DataType::Timestamp => Column::Timestamp {
                data: Vec::with_capacity(capacity),
                nulls,
            },
        }
    }

    /// Builds a column from owned values, failing on the first value the type cannot hold.
    pub fn from_values(data_type: &DataType, values: Vec<Value>) -> Result<Self> {
        let mut column = Self::with_capacity(data_type, values.len());
        for value in values {
            column.push(value)?;
        }
        Ok(column)
    }

    pub fn len(&self) -> usize {
        for_each_variant!(self, |data| data.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Column::Bool { .. } => DataType::Bool,
            Column::Int64 { .. } => DataType::Int64,
            Column::Float64 { .. } => DataType::Float64,
            Column::Numeric { .. } => DataType::Numeric,
            Column::String { .. } => DataType::String,
            Column::Bytes { .. } => DataType::Bytes,
            Column::Date { .. } => DataType::Date,
            Column::Timestamp { .. } => DataType::Timestamp,
        }
    }

    pub fn is_null(&self, index: usize) -> bool {
        with_nulls!(self, |nulls| nulls.is_null(index))
    }

    pub fn count_null(&self) -> usize {
        with_nulls!(self, |nulls| nulls.count_null())
    }

    pub fn push(&mut self, value: Value) -> Result<()> {
        match (self, value) {
            (Column::Bool { data, nulls }, Value::Null) => {
                data.push(false);
                nulls.push(true);
            }
            (Column::Bool { data, nulls }, Value::Bool(v)) => {
                data.push(v);
                nulls.push(false);
            }
            (Column::Int64 { data, nulls }, Value::Null) => {
                data.push(0);
                nulls.push(true);
            }
            (Column::Int64 { data, nulls }, Value::Int64(v)) => {
                data.push(v);
                nulls.push(false);
            }
            (Column::Float64 { data, nulls }, Value::Null) => {
                data.push(0.0);
                nulls.push(true);
            }
            (Column::Float64 { data, nulls }, Value::Float64(v)) => {
                data.push(v.0);
                nulls.push(false);
            }
            (Column::Float64 { data, nulls }, Value::Int64(v)) => {
                data.push(v as f64);
                nulls.push(false);
            }
            (Column::Numeric { data, nulls }, Value::Null) => {
                data.push(Decimal::ZERO);
                nulls.push(true);
            }
            (Column::Numeric { data, nulls }, Value::Numeric(v)) => {
                data.push(v);
                nulls.push(false);
            }
            (Column::Numeric { data, nulls }, Value::Int64(v)) => {
                data.push(Decimal::from(v));
                nulls.push(false);
            }
            (Column::String { data, nulls }, Value::Null) => {
                data.push(String::new());
                nulls.push(true);
            }
            (Column::String { data, nulls }, Value::String(v)) => {
                data.push(v);
                nulls.push(false);
            }
            (Column::Bytes { data, nulls }, Value::Null) => {
                data.push(Vec::new());
                nulls.push(true);
            }
            (Column::Bytes { data, nulls }, Value::Bytes(v)) => {
                data.push(v);
                nulls.push(false);
            }
            (Column::Date { data, nulls }, Value::Null) => {
                data.push(NaiveDate::default());
                nulls.push(true);
            }
            (Column::Date { data, nulls }, Value::Date(v)) => {
                data.push(v);
                nulls.push(false);
            }
            (Column::Timestamp { data, nulls }, Value::Null) => {
                data.push(DateTime::UNIX_EPOCH);
                nulls.push(true);
            }
            (Column::Timestamp { data, nulls }, Value::Timestamp(v)) => {
                data.push(v);
                nulls.push(false);
            }
            (col, value) => {
                return Err(Error::type_mismatch(
                    col.data_type().to_string(),
                    value.data_type().to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn get_value(&self, index: usize) -> Value {
        if index >= self.len() || self.is_null(index) {
            return Value::Null;
        }

        match self {
            Column::Bool { data, .. } => Value::Bool(data[index]),
            Column::Int64 { data, .. } => Value::Int64(data[index]),
            Column::Float64 { data, .. } => Value::float64(data[index]),
            Column::Numeric { data, .. } => Value::Numeric(data[index]),
            Column::String { data, .. } => Value::String(data[index].clone()),
            Column::Bytes { data, .. } => Value::Bytes(data[index].clone()),
            Column::Date { data, .. } => Value::Date(data[index]),
            Column::Timestamp { data, .. } => Value::Timestamp(data[index]),
        }
    }

    /// Returns a new column holding the rows at `indices`, in that order. Indices may repeat.
    pub fn gather(&self, indices: &[usize]) -> Result<Self> {
        let len = self.len();
        if let Some(&max_idx) = indices.iter().max()
            && max_idx >= len
        {
            return Err(Error::internal(format!(
                "gather: index {} out of bounds for column of length {}",
                max_idx, len
            )));
        }
        Ok(match self {
            Column::Bool { data, nulls } => gather_variant!(Bool, data, nulls, indices),
            Column::Int64 { data, nulls } => gather_variant!(Int64, data, nulls, indices),
            Column::Float64 { data, nulls } => gather_variant!(Float64, data, nulls, indices),
            Column::Numeric { data, nulls } => gather_variant!(Numeric, data, nulls, indices),
            Column::String { data, nulls } => gather_variant!(String, data, nulls, indices),
            Column::Bytes { data, nulls } => gather_variant!(Bytes, data, nulls, indices),
            Column::Date { data, nulls } => gather_variant!(Date, data, nulls, indices),
            Column::Timestamp { data, nulls } => {
                gather_variant!(Timestamp, data, nulls, indices)
            }
        })
    }

    pub fn extend(&mut self, other: &Column) -> Result<()> {
        match (self, other) {
            (Column::Bool { data: d1, nulls: n1 }, Column::Bool { data: d2, nulls: n2 }) => {
                d1.extend_from_slice(d2);
                n1.extend(n2);
            }
            (Column::Int64 { data: d1, nulls: n1 }, Column::Int64 { data: d2, nulls: n2 }) => {
                d1.extend_from_slice(d2);
                n1.extend(n2);
            }
            (
                Column::Float64 { data: d1, nulls: n1 },
                Column::Float64 { data: d2, nulls: n2 },
            ) => {
                d1.extend_from_slice(d2);
                n1.extend(n2);
            }
            (
                Column::Numeric { data: d1, nulls: n1 },
                Column::Numeric { data: d2, nulls: n2 },
            ) => {
                d1.extend_from_slice(d2);
                n1.extend(n2);
            }
            (Column::String { data: d1, nulls: n1 }, Column::String { data: d2, nulls: n2 }) => {
                d1.extend_from_slice(d2);
                n1.extend(n2);
            }
            (Column::Bytes { data: d1, nulls: n1 }, Column::Bytes { data: d2, nulls: n2 }) => {
                d1.extend_from_slice(d2);
                n1.extend(n2);
            }
            (Column::Date { data: d1, nulls: n1 }, Column::Date { data: d2, nulls: n2 }) => {
                d1.extend_from_slice(d2);
                n1.extend(n2);
            }
            (
                Column::Timestamp { data: d1, nulls: n1 },
                Column::Timestamp { data: d2, nulls: n2 },
            ) => {
                d1.extend_from_slice(d2);
                n1.extend(n2);
            }
            (a, b) => {
                return Err(Error::type_mismatch(
                    a.data_type().to_string(),
                    b.data_type().to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        for_each_variant!(&mut *self, |data| data.clear());
        with_nulls!(self, |nulls| nulls.clear());
    }
}
