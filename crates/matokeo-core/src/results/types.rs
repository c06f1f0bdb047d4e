/// Rows of cell texts, in document order
pub type Table = Vec<Vec<String>>;

/// Everything scraped from one school's result page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformanceData {
    /// Text of the page's first `<h3>`
    pub school_name: String,
    /// Division counts per sex, rows keyed by "F", "M" and "T"
    pub division_performance: Table,
    /// Examination centre summary, rows keyed by label in the first cell
    pub overall_performance: Table,
}

impl PerformanceData {
    pub fn new(
        school_name: impl Into<String>,
        division_performance: Table,
        overall_performance: Table,
    ) -> Self {
        Self {
            school_name: school_name.into(),
            division_performance,
            overall_performance,
        }
    }

    /// Find the first row whose first cell equals `key`
    pub fn division_row(&self, key: &str) -> Option<&[String]> {
        find_row(&self.division_performance, key)
    }

    /// Find the first overall row whose first cell equals `label`
    pub fn overall_row(&self, label: &str) -> Option<&[String]> {
        find_row(&self.overall_performance, label)
    }
}

fn find_row<'a>(table: &'a Table, key: &str) -> Option<&'a [String]> {
    table
        .iter()
        .find(|row| row.first().is_some_and(|cell| cell == key))
        .map(|row| row.as_slice())
}

/// One school's results reshaped into a single output line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenedRow {
    fields: Vec<String>,
}

impl FlattenedRow {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// School name is always the first field
    pub fn school_name(&self) -> &str {
        self.fields.first().map(String::as_str).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
