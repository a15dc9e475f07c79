//! # Streaming Record Writer
//!
//! Incremental serialization of rows into the fixed-size record layout.
//!
//! A session is opened with [`crate::dataset::Dataset::begin_write`], which
//! emits the header and descriptor tables and freezes the layout. Rows are
//! then built one typed append at a time and flushed with
//! [`DtaWriter::commit_record`]; [`DtaWriter::end_write`] rewinds the sink
//! and rewrites the header with the number of records actually committed.
//!
//! The sink must implement [`std::io::Seek`] for that finalize rewrite; a
//! plain append-only stream is not sufficient.

mod error;
mod stats;
mod writer_impl;


pub use error::WriteError;
pub use stats::WriteStats;
pub use writer_impl::DtaWriter;
