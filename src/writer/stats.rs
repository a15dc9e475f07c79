use std::fmt;

/// Statistics from a completed write session
#[derive(Debug, Clone)]
pub struct WriteStats {
    /// Number of variables (columns) in the file
    pub fields: usize,
    /// Number of records written
    pub records_written: usize,
    /// Fixed size of one record in bytes
    pub record_size: usize,
    /// Total file size in bytes (header + descriptors + records)
    pub file_size_bytes: u64,
}

impl fmt::Display for WriteStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} records of {} bytes across {} variables ({} bytes total)",
            self.records_written, self.record_size, self.fields, self.file_size_bytes
        )
    }
}
