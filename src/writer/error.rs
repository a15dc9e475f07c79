/// Errors that can occur while laying out or writing a file
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// I/O error from the underlying sink, propagated verbatim
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The dataset declares no fields, so no record layout exists
    #[error("dataset has no fields")]
    NoFields,

    /// A bulk pass reached a field with no column data attached
    #[error("field {field} has no column data for bulk writing")]
    MissingColumn {
        /// Name of the offending field
        field: String,
    },

    /// A column is shorter than the dataset's observation span
    #[error("column {field} has {len} values but the dataset spans {expected} observations")]
    ShortColumn {
        /// Name of the offending field
        field: String,
        /// Number of values in the column
        len: usize,
        /// Observations the dataset will write
        expected: usize,
    },

    /// An incremental append would run past the end of the record
    #[error("record overflow: appending {need} bytes at offset {offset} exceeds the {record_size}-byte record")]
    RecordOverflow {
        /// Current offset within the record buffer
        offset: usize,
        /// Bytes the append requires
        need: usize,
        /// Fixed size of one record
        record_size: usize,
    },

    /// Strict mode only: a text value would be truncated to its slot width
    #[error("{what} {text:?} for field {field} is {len} bytes, exceeding the {max}-byte slot")]
    TextOverflow {
        /// Name of the offending field, or "dataset" for the dataset label
        field: String,
        /// Which slot overflowed ("name", "format", "label")
        what: &'static str,
        /// The offending text
        text: String,
        /// Byte length of the text
        len: usize,
        /// Slot width in bytes
        max: usize,
    },
}
