mod flatten;
mod types;
mod writer;

pub use flatten::{
    DIVISION_CELLS, DIVISION_COLUMNS, DIVISION_ROW_KEYS, OVERALL_LABELS, RowFlattener, header,
};
pub use types::*;
pub use writer::{QuoteStyle, ResultsWriter, format_line};
