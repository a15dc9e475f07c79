//! # dtakit - A Stata .dta (format 113) Writer
//!
//! `dtakit` produces binary Stata dataset files in format 113 (readable by
//! Stata 8 and every later version) from in-memory columnar or row-wise
//! data, for consumption by Stata and other statistical software.
//!
//! ## Key Features
//!
//! - **Byte-exact layout**: the fixed 109-byte header, the six descriptor
//!   tables, and little-endian fixed-width records are emitted exactly as
//!   the format specifies, on any host.
//!
//! - **Two write modes**: bulk (attach whole columns and write in one
//!   pass) and streaming (append values row by row with a finalize step
//!   that rewrites the observation count in place).
//!
//! - **Typed column storage**: backing data is a closed set of typed
//!   buffers selected by the column type, so a buffer can never disagree
//!   with its declared on-disk type.
//!
//! - **Record extraction**: the [`dta_record!`] macro derives column
//!   metadata from an annotated struct, inferring numeric types from the
//!   field types.
//!
//! ## Quick Start - Bulk Columnar Write
//!
//! ```rust,no_run
//! use dtakit::dataset::Dataset;
//! use dtakit::field::ColumnData;
//!
//! let mut ds = Dataset::new();
//! ds.set_data_label("height survey");
//! ds.add_column("age", "Age in years", ColumnData::Int(vec![31, 45, 28]))?;
//! ds.add_column("height", "Height (m)", ColumnData::Double(vec![1.71, 1.62, 1.80]))?;
//!
//! let stats = ds.create("survey.dta")?;
//! println!("{stats}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Streaming Write
//!
//! ```rust,no_run
//! use dtakit::dataset::Dataset;
//! use dtakit::schema::TypeCode;
//!
//! let mut ds = Dataset::new();
//! ds.add_field_meta("id", "Identifier", TypeCode::Long);
//! ds.add_field_meta("name", "Name", TypeCode::Str(9));
//! ds.add_field_meta("score", "Score", TypeCode::Double);
//!
//! let mut w = ds.begin_write_path("scores.dta")?;
//! for (id, name, score) in [(1, "ada\0", 98.6), (2, "grace\0", 99.1)] {
//!     w.append_long(id)?;
//!     w.append_str(name, 9)?;
//!     w.append_double(score)?;
//!     w.commit_record()?;
//! }
//! let stats = w.end_write()?;
//! assert_eq!(stats.records_written, 2);
//! # Ok::<(), dtakit::writer::WriteError>(())
//! ```
//!
//! Strings shorter than their field width must be null-terminated by the
//! caller (the `\0` above); the writer copies payloads verbatim.
//!
//! ## From an Annotated Record Type
//!
//! ```rust,no_run
//! use dtakit::dataset::Dataset;
//!
//! dtakit::dta_record! {
//!     struct Measurement {
//!         station: String => { typ: "str8", label: "Station code" },
//!         reading: f64 => { format: "%10.4f" },
//!         flag: i8,
//!     }
//! }
//!
//! let template = Measurement { station: String::new(), reading: 0.0, flag: 0 };
//! let ds = Dataset::from_record(&template)?;
//! let mut w = ds.begin_write_path("readings.dta")?;
//! w.append_str("KSFO\0", 8)?;
//! w.append_double(21.125)?;
//! w.append_byte(1)?;
//! w.commit_record()?;
//! w.end_write()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`schema`]: the type system and the format's fixed layout constants
//! - [`field`]: column descriptors and typed backing buffers
//! - [`record`]: extraction of column metadata from annotated structs
//! - [`header`]: pure header and descriptor-table emission
//! - [`dataset`]: dataset assembly and the bulk write path
//! - [`writer`]: the streaming record writer with in-place finalize
//!
//! ## Scope
//!
//! This crate only writes format 113. It does not read `.dta` files, does
//! not negotiate other format versions, and does not enforce Stata's
//! identifier rules beyond the format's fixed-width truncation; names,
//! labels, and formats that overflow their slots are silently truncated
//! unless strict mode is enabled via
//! [`dataset::DatasetConfig::strict_text`].

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod dataset;
pub mod field;
pub mod header;
pub mod record;
pub mod schema;
pub mod writer;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::dataset::{Dataset, DatasetConfig};
    pub use crate::field::{ColumnData, Field, FieldData, ScalarValue};
    pub use crate::header::{emit_descriptors, emit_header, Header};
    pub use crate::record::{extract_fields, Attr, AttrTag, DtaRecord, ExtractError};
    pub use crate::schema::{SchemaError, TypeCode};
    pub use crate::writer::{DtaWriter, WriteError, WriteStats};
}
