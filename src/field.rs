//! # Field Metadata
//!
//! A [`Field`] describes one column of a dataset: display name, on-disk
//! type, label, display format, and (optionally) the in-memory data backing
//! it. Fields are written in declared order; the byte offset of a field
//! within a record is the running sum of the widths of the fields before it.
//!
//! Backing data is a closed tagged variant rather than a dynamically-typed
//! value, so a column buffer can never disagree with its field's type code:
//! [`crate::dataset::Dataset::add_column`] derives the type code from the
//! buffer it is handed.

use crate::schema::TypeCode;

/// One scalar cell value, as carried by the struct extraction adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    /// 8-bit signed integer (`byte`)
    I8(i8),
    /// 16-bit signed integer (`int`)
    I16(i16),
    /// 32-bit signed integer (`long`)
    I32(i32),
    /// 64-bit signed integer (written as `long`)
    I64(i64),
    /// 32-bit float (`float`)
    F32(f32),
    /// 64-bit float (`double`)
    F64(f64),
    /// Text; the on-disk width must come from an explicit `strN` type
    Str(String),
}

impl ScalarValue {
    /// Short name of the in-memory kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ScalarValue::I8(_) => "i8",
            ScalarValue::I16(_) => "i16",
            ScalarValue::I32(_) => "i32",
            ScalarValue::I64(_) => "i64",
            ScalarValue::F32(_) => "f32",
            ScalarValue::F64(_) => "f64",
            ScalarValue::Str(_) => "string",
        }
    }
}

impl From<i8> for ScalarValue {
    fn from(v: i8) -> Self {
        ScalarValue::I8(v)
    }
}
impl From<i16> for ScalarValue {
    fn from(v: i16) -> Self {
        ScalarValue::I16(v)
    }
}
impl From<i32> for ScalarValue {
    fn from(v: i32) -> Self {
        ScalarValue::I32(v)
    }
}
impl From<i64> for ScalarValue {
    fn from(v: i64) -> Self {
        ScalarValue::I64(v)
    }
}
impl From<f32> for ScalarValue {
    fn from(v: f32) -> Self {
        ScalarValue::F32(v)
    }
}
impl From<f64> for ScalarValue {
    fn from(v: f64) -> Self {
        ScalarValue::F64(v)
    }
}
impl From<String> for ScalarValue {
    fn from(v: String) -> Self {
        ScalarValue::Str(v)
    }
}
impl From<&str> for ScalarValue {
    fn from(v: &str) -> Self {
        ScalarValue::Str(v.to_string())
    }
}

/// A whole column of values, one variant per writable kind.
///
/// String rows are raw bytes copied verbatim into the record; rows shorter
/// than the declared width are NOT padded by the writer, and the caller is
/// responsible for null-terminating short strings.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// `byte` column
    Byte(Vec<i8>),
    /// `int` column
    Int(Vec<i16>),
    /// `long` column
    Long(Vec<i32>),
    /// `float` column
    Float(Vec<f32>),
    /// `double` column
    Double(Vec<f64>),
    /// `strN` column: declared width plus one raw row per observation
    Str {
        /// On-disk width of every row, 1..=244
        width: u8,
        /// Raw row payloads; at most `width` bytes of each are written
        rows: Vec<Vec<u8>>,
    },
}

impl ColumnData {
    /// Number of observations in the column.
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Byte(v) => v.len(),
            ColumnData::Int(v) => v.len(),
            ColumnData::Long(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Double(v) => v.len(),
            ColumnData::Str { rows, .. } => rows.len(),
        }
    }

    /// True when the column holds no observations.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Backing data attached to a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldData {
    /// Metadata-only field awaiting incremental appends
    None,
    /// A single value extracted from one record instance
    Scalar(ScalarValue),
    /// A whole column for bulk writing
    Column(ColumnData),
}

/// A column descriptor plus optional backing data.
#[derive(Debug, Clone)]
pub struct Field {
    /// Variable name (truncated to 32 bytes + NUL in the descriptor table)
    pub name: String,
    /// On-disk type
    pub ty: TypeCode,
    /// Variable label (truncated to 80 bytes + NUL in the descriptor table)
    pub label: String,
    /// Stata display format, e.g. `%9.0g` or `%15s`
    pub format: String,
    pub(crate) data: FieldData,
}

impl Field {
    /// Create a metadata-only field with the type's default display format.
    pub fn new(name: &str, label: &str, ty: TypeCode) -> Self {
        Self {
            name: name.to_string(),
            ty,
            label: label.to_string(),
            format: ty.default_format(),
            data: FieldData::None,
        }
    }

    /// Override the display format.
    pub fn with_format(mut self, format: &str) -> Self {
        self.format = format.to_string();
        self
    }

    /// The field's backing data.
    pub fn data(&self) -> &FieldData {
        &self.data
    }
}

/// Sum of field widths: the size of one record in bytes.
pub fn record_size(fields: &[Field]) -> usize {
    fields.iter().map(|f| f.ty.width()).sum()
}
