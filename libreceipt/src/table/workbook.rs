use super::TableError;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Partition every fresh workbook starts with.
pub const DEFAULT_PARTITION: &str = "Sheet1";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    #[serde(default)]
    widths: Vec<f64>,
    #[serde(default, deserialize_with = "lenient_rows")]
    rows: Vec<Vec<String>>,
}

impl Partition {
    pub fn with_widths(widths: &[f64]) -> Partition {
        Partition {
            widths: widths.to_vec(),
            rows: Vec::new(),
        }
    }

    /// Display widths, one per column.
    pub fn widths(&self) -> &[f64] {
        &self.widths
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    fn set(&mut self, row: usize, column: usize, value: &str) {
        if self.rows.len() < row {
            self.rows.resize_with(row, Vec::new);
        }
        let cells = &mut self.rows[row - 1];
        if cells.len() < column {
            cells.resize_with(column, String::new);
        }
        cells[column - 1] = value.to_string();
    }
}

/// In-memory image of the whole table. Partitions keep creation order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    partitions: IndexMap<String, Partition>,
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

impl Workbook {
    pub fn new() -> Workbook {
        let mut partitions = IndexMap::new();
        partitions.insert(DEFAULT_PARTITION.to_string(), Partition::default());
        Workbook { partitions }
    }

    pub fn has_partition(&self, name: &str) -> bool {
        self.partitions.contains_key(name)
    }

    /// Add an empty partition. Returns false, leaving it untouched, if a
    /// partition with that name already exists.
    pub fn add_partition(&mut self, name: &str, widths: &[f64]) -> bool {
        if self.has_partition(name) {
            return false;
        }
        self.partitions
            .insert(name.to_string(), Partition::with_widths(widths));
        true
    }

    pub fn partition(&self, name: &str) -> Result<&Partition, TableError> {
        self.partitions
            .get(name)
            .ok_or_else(|| TableError::MissingPartition(name.to_string()))
    }

    pub fn partitions(&self) -> impl Iterator<Item = (&str, &Partition)> {
        self.partitions.iter().map(|(name, p)| (name.as_str(), p))
    }

    pub fn rows(&self, name: &str) -> Result<&[Vec<String>], TableError> {
        Ok(self.partition(name)?.rows())
    }

    /// Write a cell at a 1-based `row` and `column`, growing the partition
    /// with blank rows and cells as needed.
    pub fn write_cell(
        &mut self,
        name: &str,
        row: usize,
        column: usize,
        value: &str,
    ) -> Result<(), TableError> {
        if row == 0 || column == 0 {
            return Err(TableError::InvalidCell { row, column });
        }
        let partition = self
            .partitions
            .get_mut(name)
            .ok_or_else(|| TableError::MissingPartition(name.to_string()))?;
        partition.set(row, column, value);
        Ok(())
    }
}

// Hand-edited files may hold numbers or nulls where text is expected.
fn lenient_rows<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec<String>>, D::Error> {
    let rows = Vec::<Vec<Value>>::deserialize(deserializer)?;
    Ok(rows
        .into_iter()
        .map(|row| row.into_iter().map(cell_text).collect())
        .collect())
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
