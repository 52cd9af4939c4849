use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strata_common::error::{Error, Result};
use strata_common::types::Value;
use strata_common::{ColumnInfo, QueryResult, Row};

use crate::{Column, Field, Record, Schema};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    schema: Schema,
    columns: IndexMap<String, Arc<Column>>,
    row_count: usize,
}

impl Table {
    pub fn new(schema: Schema) -> Self {
        let columns = schema
            .fields()
            .iter()
            .map(|f| (f.name.clone(), Arc::new(Column::new(&f.data_type))))
            .collect();
        Self {
            schema,
            columns,
            row_count: 0,
        }
    }

    pub fn empty(schema: Schema) -> Self {
        Self::new(schema)
    }

    /// Assembles a table from prebuilt columns, which must match the schema in count,
    /// order and length.
    pub fn from_arc_columns(schema: Schema, columns: Vec<Arc<Column>>) -> Result<Self> {
        schema.validate()?;
        if schema.field_count() != columns.len() {
            return Err(Error::internal(format!(
                "schema has {} fields but {} columns were supplied",
                schema.field_count(),
                columns.len()
            )));
        }
        let row_count = columns.first().map(|c| c.len()).unwrap_or(0);
        if let Some(bad) = columns.iter().position(|c| c.len() != row_count) {
            return Err(Error::internal(format!(
                "column '{}' has {} rows, expected {}",
                schema.fields()[bad].name,
                columns[bad].len(),
                row_count
            )));
        }
        let columns = schema
            .fields()
            .iter()
            .map(|f| f.name.clone())
            .zip(columns)
            .collect();
        Ok(Self {
            schema,
            columns,
            row_count,
        })
    }

    pub fn from_columns(schema: Schema, columns: Vec<Column>) -> Result<Self> {
        Self::from_arc_columns(schema, columns.into_iter().map(Arc::new).collect())
    }

    pub fn from_values(schema: Schema, rows: Vec<Vec<Value>>) -> Result<Self> {
        schema.validate()?;
        let mut table = Self::new(schema);
        table.push_rows(rows)?;
        Ok(table)
    }

    pub fn from_records(schema: Schema, records: Vec<Record>) -> Result<Self> {
        Self::from_values(schema, records.into_iter().map(Record::into_values).collect())
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, idx: usize) -> Option<&Column> {
        self.columns.get_index(idx).map(|(_, col)| col.as_ref())
    }

    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.get(name).map(|arc| arc.as_ref())
    }

    pub fn get_column(&self, name: &str) -> Option<Arc<Column>> {
        self.columns.get(name).map(Arc::clone)
    }

    pub fn columns(&self) -> &IndexMap<String, Arc<Column>> {
        &self.columns
    }

    /// Looks up a column, naming the table's columns in the error.
    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.column_by_name(name).ok_or_else(|| {
            Error::schema_mismatch(format!(
                "column '{}' not found (available: {})",
                name,
                self.schema.field_names().join(", ")
            ))
        })
    }

    pub fn push_row(&mut self, values: Vec<Value>) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(Error::schema_mismatch(format!(
                "row has {} values but table has {} columns",
                values.len(),
                self.columns.len()
            )));
        }
        for (col, value) in self.columns.values_mut().zip(values) {
            Arc::make_mut(col).push(value)?;
        }
        self.row_count += 1;
        Ok(())
    }

    pub fn push_rows(&mut self, rows: Vec<Vec<Value>>) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let num_rows = rows.len();
        let num_cols = self.columns.len();
        let mut columns_data: Vec<Vec<Value>> = vec![Vec::with_capacity(num_rows); num_cols];

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != num_cols {
                return Err(Error::schema_mismatch(format!(
                    "row {} has {} values but table has {} columns",
                    row_idx,
                    row.len(),
                    num_cols
                )));
            }
            for (col_idx, value) in row.into_iter().enumerate() {
                columns_data[col_idx].push(value);
            }
        }

        let mut staged = Vec::with_capacity(num_cols);
        for (col, values) in self.columns.values().zip(columns_data) {
            let mut col = col.as_ref().clone();
            for value in values {
                col.push(value)?;
            }
            staged.push(col);
        }
        for (slot, col) in self.columns.values_mut().zip(staged) {
            *slot = Arc::new(col);
        }

        self.row_count += num_rows;
        Ok(())
    }

    pub fn get_row(&self, index: usize) -> Result<Record> {
        if index >= self.row_count {
            return Err(Error::internal(format!(
                "Row index {} out of bounds (count: {})",
                index, self.row_count
            )));
        }
        Ok(Record::from_columns(
            self.columns.values().map(|c| c.as_ref()),
            index,
        ))
    }

    pub fn to_records(&self) -> Result<Vec<Record>> {
        (0..self.row_count).map(|i| self.get_row(i)).collect()
    }

    pub fn gather_rows(&self, indices: &[usize]) -> Result<Self> {
        let mut new_columns = IndexMap::with_capacity(self.columns.len());
        for (name, col) in &self.columns {
            new_columns.insert(name.clone(), Arc::new(col.gather(indices)?));
        }
        Ok(Self {
            schema: self.schema.clone(),
            columns: new_columns,
            row_count: indices.len(),
        })
    }

    /// Keeps only `names`, in that order. Columns are shared, not copied.
    pub fn project(&self, names: &[String]) -> Result<Self> {
        let indices = self.schema.resolve_indices(names)?;
        let fields: Vec<Field> = indices
            .iter()
            .map(|&i| self.schema.fields()[i].clone())
            .collect();
        let columns = indices
            .iter()
            .filter_map(|&i| self.columns.get_index(i).map(|(_, c)| Arc::clone(c)))
            .collect();
        let mut table = Self::from_arc_columns(Schema::from_fields(fields), columns)?;
        table.row_count = self.row_count;
        Ok(table)
    }

    /// Appends a column of the same length as the table.
    pub fn with_column(&self, field: Field, column: Column) -> Result<Self> {
        if self.schema.contains(&field.name) {
            return Err(Error::schema_mismatch(format!(
                "column '{}' already exists",
                field.name
            )));
        }
        if column.len() != self.row_count {
            return Err(Error::internal(format!(
                "column '{}' has {} rows, table has {}",
                field.name,
                column.len(),
                self.row_count
            )));
        }
        let mut table = self.clone();
        table.columns.insert(field.name.clone(), Arc::new(column));
        table.schema.add_field(field);
        Ok(table)
    }

    pub fn concat(&self, other: &Table) -> Result<Self> {
        if self.schema.field_names() != other.schema.field_names() {
            return Err(Error::schema_mismatch(
                "cannot concatenate tables with different columns",
            ));
        }
        let mut new_columns = IndexMap::with_capacity(self.columns.len());
        for ((name, col), other_col) in self.columns.iter().zip(other.columns.values()) {
            let mut merged = col.as_ref().clone();
            merged.extend(other_col)?;
            new_columns.insert(name.clone(), Arc::new(merged));
        }
        Ok(Self {
            schema: self.schema.clone(),
            columns: new_columns,
            row_count: self.row_count + other.row_count,
        })
    }

    pub fn to_query_result(&self) -> Result<QueryResult> {
        let schema: Vec<ColumnInfo> = self
            .schema
            .fields()
            .iter()
            .map(|f| ColumnInfo::new(&f.name, f.data_type.to_string()))
            .collect();

        let rows: Vec<Row> = self
            .to_records()?
            .into_iter()
            .map(|record| Row::new(record.into_values()))
            .collect();

        Ok(QueryResult::new(schema, rows))
    }
}
