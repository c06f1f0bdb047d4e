use super::types::{FlattenedRow, PerformanceData};
use crate::{Error, Result};

/// Division table row keys, in output order
pub const DIVISION_ROW_KEYS: [&str; 3] = ["F", "M", "T"];

/// Division outcomes, in output order within each row
pub const DIVISION_COLUMNS: [&str; 5] = ["I", "II", "III", "IV", "0"];

/// Overall table labels, in output order
pub const OVERALL_LABELS: [&str; 3] = [
    "EXAMINATION CENTRE REGION",
    "TOTAL PASSED CANDIDATES",
    "EXAMINATION CENTRE GPA",
];

/// Cells contributed by the division table (3 rows x 5 outcomes)
pub const DIVISION_CELLS: usize = DIVISION_ROW_KEYS.len() * DIVISION_COLUMNS.len();

/// Column names of the output file, 19 in total
pub fn header() -> Vec<String> {
    let mut columns = Vec::with_capacity(1 + DIVISION_CELLS + OVERALL_LABELS.len());
    columns.push("School name".to_string());

    for key in DIVISION_ROW_KEYS {
        for column in DIVISION_COLUMNS {
            columns.push(format!("{}{}", key, column));
        }
    }

    columns.extend(OVERALL_LABELS.iter().map(|label| label.to_string()));
    columns
}

/// Reshapes one school's scraped tables into a single output row
pub struct RowFlattener;

impl RowFlattener {
    /// Flatten `data` into `[name, 15 division cells, 0..=3 overall values]`
    ///
    /// Every division row must be present with exactly five trailing cells,
    /// otherwise the school is rejected with [`Error::RowShape`]. Overall
    /// labels that are missing, or whose value cell is absent or empty, are
    /// dropped without error.
    pub fn flatten(data: &PerformanceData) -> Result<FlattenedRow> {
        let division = Self::division_segment(data)?;
        let overall = Self::overall_segment(data);

        let mut fields = Vec::with_capacity(1 + division.len() + overall.len());
        fields.push(data.school_name.clone());
        fields.extend(division);
        fields.extend(overall);

        Ok(FlattenedRow::new(fields))
    }

    fn division_segment(data: &PerformanceData) -> Result<Vec<String>> {
        let rows: Vec<&[String]> = DIVISION_ROW_KEYS
            .iter()
            .map(|key| data.division_row(key).map(|row| &row[1..]).unwrap_or(&[]))
            .collect();

        let segment: Vec<String> = rows.iter().flat_map(|cells| cells.iter().cloned()).collect();

        let well_formed = rows
            .iter()
            .all(|cells| cells.len() == DIVISION_COLUMNS.len());

        if !well_formed || segment.len() != DIVISION_CELLS {
            tracing::error!(
                "Malformed division table for {}: {:?}",
                data.school_name,
                segment
            );
            return Err(Error::RowShape {
                school: data.school_name.clone(),
                cells: segment.len(),
            });
        }

        Ok(segment)
    }

    fn overall_segment(data: &PerformanceData) -> Vec<String> {
        OVERALL_LABELS
            .iter()
            .filter_map(|label| data.overall_row(label).and_then(|row| row.get(1)))
            .filter(|value| !value.is_empty())
            .cloned()
            .collect()
    }
}
