use std::io::{Seek, SeekFrom, Write};

use byteorder::{ByteOrder, LittleEndian};
use log::debug;

use crate::dataset::Dataset;
use crate::field::Field;
use crate::header::{check_text_widths, descriptors_len, emit_descriptors, emit_header, Header};
use crate::schema::HEADER_LEN;

use super::{WriteError, WriteStats};

/// An open incremental write session.
///
/// Obtained from [`Dataset::begin_write`], which emits the header and
/// descriptor tables and fixes the record layout. Values are appended into
/// an internal record buffer in declared field order, one append per field
/// per row, then [`commit_record`](Self::commit_record) flushes the row.
/// [`end_write`](Self::end_write) rewrites the header in place with the
/// true observation count and consumes the writer; dropping the sink closes
/// it.
///
/// Appends are bounds-checked against the record size and fail with
/// [`WriteError::RecordOverflow`] rather than corrupting adjacent fields.
/// Two obligations stay with the caller: append every field before
/// committing, and null-pad string values shorter than their field width —
/// the record buffer is reused across rows without re-zeroing, so skipped
/// trailing bytes hold whatever the buffer last held.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use dtakit::dataset::Dataset;
/// use dtakit::schema::TypeCode;
///
/// let mut ds = Dataset::new();
/// ds.add_field_meta("id", "Identifier", TypeCode::Long);
/// ds.add_field_meta("score", "Score", TypeCode::Double);
///
/// let mut w = ds.begin_write(Cursor::new(Vec::new()))?;
/// w.append_long(1)?;
/// w.append_double(98.6)?;
/// w.commit_record()?;
///
/// let stats = w.end_write()?;
/// assert_eq!(stats.records_written, 1);
/// # Ok::<(), dtakit::writer::WriteError>(())
/// ```
#[derive(Debug)]
pub struct DtaWriter<W: Write + Seek> {
    sink: W,
    header: Header,
    fields: Vec<Field>,
    record_size: usize,
    rec_buf: Vec<u8>,
    offset: usize,
    records_written: usize,
}

impl<W: Write + Seek> DtaWriter<W> {
    /// Open a session: validate, emit header and descriptors, and fix the
    /// record layout. Called through [`Dataset::begin_write`].
    pub(crate) fn begin(dataset: Dataset, mut sink: W) -> Result<Self, WriteError> {
        let Dataset {
            mut header,
            fields,
            record_size,
            config,
        } = dataset;
        if fields.is_empty() {
            return Err(WriteError::NoFields);
        }
        if config.strict_text {
            check_text_widths(&fields, &header.data_label)?;
        }
        header.num_vars = fields.len() as i16;
        header.num_obs = 0;
        sink.write_all(&emit_header(&header))?;
        sink.write_all(&emit_descriptors(&fields))?;
        debug!(
            "write session opened: {} fields, {} byte records",
            fields.len(),
            record_size
        );
        Ok(Self {
            sink,
            header,
            fields,
            record_size,
            rec_buf: vec![0u8; record_size],
            offset: 0,
            records_written: 0,
        })
    }

    fn ensure(&self, need: usize) -> Result<(), WriteError> {
        if self.offset + need > self.record_size {
            return Err(WriteError::RecordOverflow {
                offset: self.offset,
                need,
                record_size: self.record_size,
            });
        }
        Ok(())
    }

    /// Append a `byte` value (1 byte).
    pub fn append_byte(&mut self, v: i8) -> Result<(), WriteError> {
        self.ensure(1)?;
        self.rec_buf[self.offset] = v as u8;
        self.offset += 1;
        Ok(())
    }

    /// Append an `int` value (2 bytes, little-endian).
    pub fn append_int(&mut self, v: i16) -> Result<(), WriteError> {
        self.ensure(2)?;
        LittleEndian::write_i16(&mut self.rec_buf[self.offset..self.offset + 2], v);
        self.offset += 2;
        Ok(())
    }

    /// Append a `long` value (4 bytes, little-endian).
    pub fn append_long(&mut self, v: i32) -> Result<(), WriteError> {
        self.ensure(4)?;
        LittleEndian::write_i32(&mut self.rec_buf[self.offset..self.offset + 4], v);
        self.offset += 4;
        Ok(())
    }

    /// Append a `float` value (4 bytes, little-endian IEEE).
    pub fn append_float(&mut self, v: f32) -> Result<(), WriteError> {
        self.ensure(4)?;
        LittleEndian::write_f32(&mut self.rec_buf[self.offset..self.offset + 4], v);
        self.offset += 4;
        Ok(())
    }

    /// Append a `double` value (8 bytes, little-endian IEEE).
    pub fn append_double(&mut self, v: f64) -> Result<(), WriteError> {
        self.ensure(8)?;
        LittleEndian::write_f64(&mut self.rec_buf[self.offset..self.offset + 8], v);
        self.offset += 8;
        Ok(())
    }

    /// Append a string into a `strN` slot of the given width. At most
    /// `width` bytes are copied, verbatim, with no forced null-termination;
    /// the cursor advances by the full width either way.
    pub fn append_str(&mut self, v: &str, width: usize) -> Result<(), WriteError> {
        self.append_bytes(v.as_bytes(), width)
    }

    /// Append raw bytes into a `strN` slot of the given width. Same
    /// semantics as [`append_str`](Self::append_str).
    pub fn append_bytes(&mut self, v: &[u8], width: usize) -> Result<(), WriteError> {
        self.ensure(width)?;
        let n = v.len().min(width);
        self.rec_buf[self.offset..self.offset + n].copy_from_slice(&v[..n]);
        self.offset += width;
        Ok(())
    }

    /// Flush the accumulated record to the sink, reset the append cursor,
    /// and count the observation. The caller must have appended every field
    /// first; the buffer is written as-is.
    pub fn commit_record(&mut self) -> Result<(), WriteError> {
        self.sink.write_all(&self.rec_buf)?;
        self.offset = 0;
        self.records_written += 1;
        Ok(())
    }

    /// Records committed so far.
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Fixed size of one record in bytes.
    pub fn record_size(&self) -> usize {
        self.record_size
    }

    /// The session's fields, in write order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Finalize: flush buffered output, seek back to the start, re-emit the
    /// header with the true observation count, and flush again. Consumes
    /// the writer; dropping the returned sink's file handle closes it.
    pub fn end_write(mut self) -> Result<WriteStats, WriteError> {
        self.sink.flush()?;
        self.header.num_obs = self.records_written as i32;
        self.sink.seek(SeekFrom::Start(0))?;
        self.sink.write_all(&emit_header(&self.header))?;
        self.sink.flush()?;
        debug!("write session finalized: {} records", self.records_written);
        Ok(WriteStats {
            fields: self.fields.len(),
            records_written: self.records_written,
            record_size: self.record_size,
            file_size_bytes: (HEADER_LEN
                + descriptors_len(self.fields.len())
                + self.records_written * self.record_size) as u64,
        })
    }
}
