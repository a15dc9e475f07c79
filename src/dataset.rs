//! # Dataset Construction
//!
//! A [`Dataset`] collects ordered [`Field`]s plus header state and offers
//! the two write paths:
//!
//! - **Bulk**: attach whole columns with [`Dataset::add_column`], then emit
//!   header, descriptors, and every record in one pass with
//!   [`Dataset::write_to`] or [`Dataset::create`].
//! - **Incremental**: declare fields with [`Dataset::add_field_meta`], open
//!   a session with [`Dataset::begin_write`], append values row by row, and
//!   finalize. `begin_write` consumes the dataset, so the layout is fixed
//!   once the first header byte is out.
//!
//! The observation count works differently per path: bulk uses the longest
//! attached column, while an incremental session counts committed records
//! and rewrites the header on finalize.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};
use log::debug;

use crate::field::{self, ColumnData, Field, FieldData};
use crate::header::{check_text_widths, descriptors_len, emit_descriptors, emit_header, Header};
use crate::record::{DtaRecord, ExtractError};
use crate::schema::{SchemaError, TypeCode, HEADER_LEN};
use crate::writer::{DtaWriter, WriteError, WriteStats};

/// Buffer size for file sinks
const FILE_BUF_SIZE: usize = 64 * 1024;

/// Configuration for dataset writing
#[derive(Debug, Clone, Default)]
pub struct DatasetConfig {
    /// Fail with [`WriteError::TextOverflow`] instead of silently
    /// truncating over-long names, labels, and formats. Off by default:
    /// silent truncation is the format-compatible behavior.
    pub strict_text: bool,
}

/// An in-memory description of one `.dta` file: header state plus ordered
/// fields.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use dtakit::dataset::Dataset;
/// use dtakit::field::ColumnData;
///
/// let mut ds = Dataset::new();
/// ds.set_data_label("demo");
/// ds.add_column("age", "Age in years", ColumnData::Int(vec![31, 45, 28]))?;
/// ds.add_column("income", "Income", ColumnData::Double(vec![51e3, 62e3, 48e3]))?;
///
/// let mut out = Cursor::new(Vec::new());
/// let stats = ds.write_to(&mut out)?;
/// assert_eq!(stats.records_written, 3);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Dataset {
    pub(crate) header: Header,
    pub(crate) fields: Vec<Field>,
    pub(crate) record_size: usize,
    pub(crate) config: DatasetConfig,
}

impl Dataset {
    /// An empty dataset with default configuration.
    pub fn new() -> Self {
        Self::with_config(DatasetConfig::default())
    }

    /// An empty dataset with the given configuration.
    pub fn with_config(config: DatasetConfig) -> Self {
        Self {
            header: Header::new(),
            fields: Vec::new(),
            record_size: 0,
            config,
        }
    }

    /// Build a dataset whose fields are extracted from an annotated record
    /// type (see [`crate::dta_record!`]).
    pub fn from_record<R: DtaRecord>(record: &R) -> Result<Self, ExtractError> {
        let fields = record.dta_fields()?;
        let record_size = field::record_size(&fields);
        let mut header = Header::new();
        header.num_vars = fields.len() as i16;
        Ok(Self {
            header,
            fields,
            record_size,
            config: DatasetConfig::default(),
        })
    }

    /// Set the dataset label (81-byte slot in the header, null-padded).
    pub fn set_data_label(&mut self, label: &str) {
        self.header.data_label = label.to_string();
    }

    /// Append an already-built field. Record size and the variable count
    /// track every addition.
    pub fn add_field(&mut self, field: Field) -> &mut Field {
        self.record_size += field.ty.width();
        if let FieldData::Column(col) = &field.data {
            let len = col.len() as i32;
            if len > self.header.num_obs {
                self.header.num_obs = len;
            }
        }
        self.fields.push(field);
        self.header.num_vars = self.fields.len() as i16;
        let idx = self.fields.len() - 1;
        &mut self.fields[idx]
    }

    /// Declare a metadata-only field for incremental writing. The display
    /// format defaults per type (`%9.0g` numeric, `%Ns` strings).
    pub fn add_field_meta(&mut self, name: &str, label: &str, ty: TypeCode) -> &mut Field {
        self.add_field(Field::new(name, label, ty))
    }

    /// Attach a whole column for bulk writing. The on-disk type is derived
    /// from the buffer, so the data can never disagree with the type code;
    /// the only failure is a string width outside [1, 244]. The dataset's
    /// observation count grows to the longest attached column.
    pub fn add_column(
        &mut self,
        name: &str,
        label: &str,
        data: ColumnData,
    ) -> Result<&mut Field, SchemaError> {
        let ty = match &data {
            ColumnData::Byte(_) => TypeCode::Byte,
            ColumnData::Int(_) => TypeCode::Int,
            ColumnData::Long(_) => TypeCode::Long,
            ColumnData::Float(_) => TypeCode::Float,
            ColumnData::Double(_) => TypeCode::Double,
            ColumnData::Str { width, .. } => TypeCode::str_width(*width as usize)?,
        };
        let mut f = Field::new(name, label, ty);
        f.data = FieldData::Column(data);
        Ok(self.add_field(f))
    }

    /// The declared fields, in write order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of variables.
    pub fn num_vars(&self) -> usize {
        self.fields.len()
    }

    /// Current observation count (longest attached column).
    pub fn num_obs(&self) -> usize {
        self.header.num_obs as usize
    }

    /// Size of one record in bytes: the sum of all field widths.
    pub fn record_size(&self) -> usize {
        self.record_size
    }

    /// Bulk mode: emit header, descriptor tables, and one record per
    /// observation to `w`.
    ///
    /// Every field must carry column data spanning the full observation
    /// count. String rows are copied verbatim with no forced
    /// null-termination; rows shorter than the field width leave whatever
    /// the record buffer last held in the trailing bytes, so callers pad
    /// short strings themselves.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<WriteStats, WriteError> {
        if self.fields.is_empty() {
            return Err(WriteError::NoFields);
        }
        if self.config.strict_text {
            check_text_widths(&self.fields, &self.header.data_label)?;
        }
        let num_obs = self.header.num_obs as usize;
        for f in &self.fields {
            match &f.data {
                FieldData::Column(col) => {
                    if col.len() < num_obs {
                        return Err(WriteError::ShortColumn {
                            field: f.name.clone(),
                            len: col.len(),
                            expected: num_obs,
                        });
                    }
                }
                _ => {
                    return Err(WriteError::MissingColumn {
                        field: f.name.clone(),
                    })
                }
            }
        }

        let mut header = self.header.clone();
        header.num_vars = self.fields.len() as i16;
        w.write_all(&emit_header(&header))?;
        w.write_all(&emit_descriptors(&self.fields))?;

        // One reusable record buffer; slots are overwritten in place, never
        // re-zeroed between records.
        let mut buf = vec![0u8; self.record_size];
        for row in 0..num_obs {
            let mut off = 0;
            for f in &self.fields {
                if let FieldData::Column(col) = &f.data {
                    off += encode_cell(&mut buf[off..], col, row);
                }
            }
            w.write_all(&buf)?;
        }

        debug!(
            "bulk wrote {} records of {} bytes across {} fields",
            num_obs,
            self.record_size,
            self.fields.len()
        );
        Ok(WriteStats {
            fields: self.fields.len(),
            records_written: num_obs,
            record_size: self.record_size,
            file_size_bytes: (HEADER_LEN
                + descriptors_len(self.fields.len())
                + num_obs * self.record_size) as u64,
        })
    }

    /// Bulk mode convenience: create (or truncate) `path` and write the
    /// whole file through a buffered sink.
    pub fn create<P: AsRef<Path>>(&self, path: P) -> Result<WriteStats, WriteError> {
        let file = File::create(path)?;
        let mut w = BufWriter::with_capacity(FILE_BUF_SIZE, file);
        let stats = self.write_to(&mut w)?;
        w.flush()?;
        Ok(stats)
    }

    /// Open an incremental write session on `sink`, emitting the header and
    /// descriptor tables. Consumes the dataset: the layout is immutable for
    /// the rest of the session. The sink must support seeking so the
    /// finalize step can rewrite the header with the true observation
    /// count.
    pub fn begin_write<W: Write + std::io::Seek>(self, sink: W) -> Result<DtaWriter<W>, WriteError> {
        DtaWriter::begin(self, sink)
    }

    /// Open an incremental write session on a new file at `path`, through a
    /// 64 KiB buffered sink.
    pub fn begin_write_path<P: AsRef<Path>>(
        self,
        path: P,
    ) -> Result<DtaWriter<BufWriter<File>>, WriteError> {
        let file = File::create(path)?;
        self.begin_write(BufWriter::with_capacity(FILE_BUF_SIZE, file))
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode one cell at the head of `dst`, returning the field width.
fn encode_cell(dst: &mut [u8], col: &ColumnData, row: usize) -> usize {
    match col {
        ColumnData::Byte(v) => {
            dst[0] = v[row] as u8;
            1
        }
        ColumnData::Int(v) => {
            LittleEndian::write_i16(&mut dst[..2], v[row]);
            2
        }
        ColumnData::Long(v) => {
            LittleEndian::write_i32(&mut dst[..4], v[row]);
            4
        }
        ColumnData::Float(v) => {
            LittleEndian::write_f32(&mut dst[..4], v[row]);
            4
        }
        ColumnData::Double(v) => {
            LittleEndian::write_f64(&mut dst[..8], v[row]);
            8
        }
        ColumnData::Str { width, rows } => {
            let w = *width as usize;
            let payload = &rows[row];
            let n = payload.len().min(w);
            dst[..n].copy_from_slice(&payload[..n]);
            w
        }
    }
}
