//! # Header and Descriptor Encoding
//!
//! Pure transformations from a dataset's metadata to the fixed on-disk
//! layout: the 109-byte header and the six descriptor tables that follow
//! it. Nothing here touches a sink; both emitters return owned byte
//! buffers, and calling them twice on unchanged input produces identical
//! bytes.
//!
//! Text is copied into pre-zeroed fixed-width slots: short strings come out
//! null-padded, over-long strings are silently truncated to the slot width.
//! Truncation is the format's documented policy, not an error; callers that
//! want hard failures instead use [`check_text_widths`].

use byteorder::{ByteOrder, LittleEndian};
use chrono::Local;

use crate::field::Field;
use crate::schema::{
    BYTE_ORDER_LOHI, EXPANSION_LEN, FILE_TYPE, FORMAT_LEN, FORMAT_VERSION, HEADER_LEN, LABEL_LEN,
    VAR_NAME_LEN,
};
use crate::writer::WriteError;

/// The fixed 109-byte file header.
///
/// Version, byte order, and file type are constants of the format; only the
/// counts and the two text slots vary between files.
#[derive(Debug, Clone)]
pub struct Header {
    /// Number of variables (descriptor tables are sized by this)
    pub num_vars: i16,
    /// Number of observations; rewritten in place by the finalize step
    pub num_obs: i32,
    /// Dataset label, up to 80 bytes + NUL
    pub data_label: String,
    /// Creation timestamp, "DD Mon YYYY HH:MM"
    pub timestamp: String,
}

impl Header {
    /// A header with zero counts, an empty label, and the current local time.
    pub fn new() -> Self {
        Self {
            num_vars: 0,
            num_obs: 0,
            data_label: String::new(),
            timestamp: Local::now().format("%d %b %Y %H:%M").to_string(),
        }
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy `s` into a pre-zeroed slot, truncating at the slot width.
fn put_text(dst: &mut [u8], s: &str) {
    let bytes = s.as_bytes();
    let n = bytes.len().min(dst.len());
    dst[..n].copy_from_slice(&bytes[..n]);
}

/// Serialize the header to its exact 109-byte representation.
pub fn emit_header(header: &Header) -> Vec<u8> {
    let mut buf = vec![0u8; HEADER_LEN];
    buf[0] = FORMAT_VERSION;
    buf[1] = BYTE_ORDER_LOHI;
    buf[2] = FILE_TYPE;
    // buf[3] stays 0 (unused)
    LittleEndian::write_i16(&mut buf[4..6], header.num_vars);
    LittleEndian::write_i32(&mut buf[6..10], header.num_obs);
    put_text(&mut buf[10..10 + LABEL_LEN], &header.data_label);
    put_text(&mut buf[10 + LABEL_LEN..HEADER_LEN], &header.timestamp);
    buf
}

/// Total size of the descriptor section for `num_vars` fields:
/// type list + name list + sort list + format list + value-label-name
/// list + variable-label list + expansion terminator.
pub fn descriptors_len(num_vars: usize) -> usize {
    num_vars * (1 + VAR_NAME_LEN + FORMAT_LEN + VAR_NAME_LEN + LABEL_LEN)
        + 2 * (num_vars + 1)
        + EXPANSION_LEN
}

/// Serialize the six descriptor tables in their fixed order.
///
/// The sort-order list and the value-label-name list are always
/// zero-filled; the 81-byte variable-label list carries each field's label.
pub fn emit_descriptors(fields: &[Field]) -> Vec<u8> {
    let n = fields.len();
    let mut buf = vec![0u8; descriptors_len(n)];
    let mut off = 0;

    for (i, f) in fields.iter().enumerate() {
        buf[off + i] = f.ty.code();
    }
    off += n;

    for (i, f) in fields.iter().enumerate() {
        let slot = off + i * VAR_NAME_LEN;
        put_text(&mut buf[slot..slot + VAR_NAME_LEN], &f.name);
    }
    off += n * VAR_NAME_LEN;

    // sort list: 2*(n+1) zero bytes
    off += 2 * (n + 1);

    for (i, f) in fields.iter().enumerate() {
        let slot = off + i * FORMAT_LEN;
        put_text(&mut buf[slot..slot + FORMAT_LEN], &f.format);
    }
    off += n * FORMAT_LEN;

    // value-label-name list: unused, stays zero
    off += n * VAR_NAME_LEN;

    for (i, f) in fields.iter().enumerate() {
        let slot = off + i * LABEL_LEN;
        put_text(&mut buf[slot..slot + LABEL_LEN], &f.label);
    }
    off += n * LABEL_LEN;

    off += EXPANSION_LEN;
    debug_assert_eq!(off, buf.len());
    buf
}

/// Strict-mode companion to the lenient emitters: fail with
/// [`WriteError::TextOverflow`] for any text that [`emit_header`] or
/// [`emit_descriptors`] would truncate.
pub fn check_text_widths(fields: &[Field], data_label: &str) -> Result<(), WriteError> {
    let overflow = |field: &str, what: &'static str, text: &str, max: usize| {
        Err(WriteError::TextOverflow {
            field: field.to_string(),
            what,
            text: text.to_string(),
            len: text.len(),
            max,
        })
    };
    if data_label.len() > LABEL_LEN {
        return overflow("dataset", "label", data_label, LABEL_LEN);
    }
    for f in fields {
        if f.name.len() > VAR_NAME_LEN {
            return overflow(&f.name, "name", &f.name, VAR_NAME_LEN);
        }
        if f.format.len() > FORMAT_LEN {
            return overflow(&f.name, "format", &f.format, FORMAT_LEN);
        }
        if f.label.len() > LABEL_LEN {
            return overflow(&f.name, "label", &f.label, LABEL_LEN);
        }
    }
    Ok(())
}
