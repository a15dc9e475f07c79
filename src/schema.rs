//! # .dta 113 Layout Definition
//!
//! This module defines the type system and the fixed byte layout of the
//! Stata `.dta` version-113 format (readable by Stata 8 and later).
//!
//! ## On-disk type codes
//!
//! | Type | Code | Width (bytes) |
//! |--------|------------|---------------|
//! | str1..str244 | 1..244 | 1..244 |
//! | byte | 251 (0xfb) | 1 |
//! | int | 252 (0xfc) | 2 |
//! | long | 253 (0xfd) | 4 |
//! | float | 254 (0xfe) | 4 |
//! | double | 255 (0xff) | 8 |
//!
//! A string type's code *is* its byte width; the five numeric kinds use
//! reserved sentinel codes above the string range. No other code is valid.
//!
//! ## Fixed layout
//!
//! A file is a 109-byte header, six descriptor tables sized by the variable
//! count, a 5-byte expansion terminator, and then one fixed-size record per
//! observation. All multi-byte integers are little-endian regardless of the
//! host byte order.

/// .dta format version emitted by this crate (113, Stata 8/9)
pub const FORMAT_VERSION: u8 = 113;

/// Byte-order marker: 0x02 = LOHI (little-endian). This writer always
/// emits little-endian data, so the marker never varies.
pub const BYTE_ORDER_LOHI: u8 = 2;

/// File-type byte, always 1
pub const FILE_TYPE: u8 = 1;

/// Total header size in bytes
pub const HEADER_LEN: usize = 109;

/// Width of a variable-name slot (null-padded)
pub const VAR_NAME_LEN: usize = 33;

/// Width of a display-format slot (null-padded)
pub const FORMAT_LEN: usize = 12;

/// Width of the dataset label and of a variable-label slot (null-padded)
pub const LABEL_LEN: usize = 81;

/// Width of the header timestamp slot ("DD Mon YYYY HH:MM", null-padded)
pub const TIMESTAMP_LEN: usize = 18;

/// Size of the zero-filled expansion terminator after the descriptor tables
pub const EXPANSION_LEN: usize = 5;

/// Largest representable fixed-string width
pub const MAX_STR_WIDTH: u8 = 244;

/// On-disk type codes for the numeric kinds
pub mod type_codes {
    /// 1-byte signed integer
    pub const BYTE: u8 = 251;
    /// 2-byte signed integer
    pub const INT: u8 = 252;
    /// 4-byte signed integer
    pub const LONG: u8 = 253;
    /// 4-byte IEEE float
    pub const FLOAT: u8 = 254;
    /// 8-byte IEEE float
    pub const DOUBLE: u8 = 255;
}

/// Stata missing-value sentinels, one per numeric kind.
///
/// Stata reserves the top of each numeric range for missing values; a cell
/// holding the sentinel reads back as `.` in Stata. The writer does not
/// substitute these itself.
pub mod missing {
    /// Missing value for `byte` columns
    pub const BYTE: i8 = 127;
    /// Missing value for `int` columns
    pub const INT: i16 = 32767;
    /// Missing value for `long` columns
    pub const LONG: i32 = 2147483647;
    /// Missing value for `float` columns (2^127)
    pub const FLOAT: f32 = 1.7014118346046923e38;
    /// Missing value for `double` columns (2^1023)
    pub const DOUBLE: f64 = 8.98846567431158e307;
}

/// Errors from type-code construction and parsing
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A `strN` width outside the representable range [1, 244]
    #[error("string width {0} out of range (must be 1..=244)")]
    StringWidthOutOfRange(usize),

    /// A type string that is neither `strN` nor a numeric kind name
    #[error("unknown type: {0:?}")]
    UnknownType(String),

    /// An on-disk code in the reserved gap between strings and numerics
    #[error("invalid type code {0}")]
    InvalidCode(u8),
}

/// A column's on-disk representation: fixed-width string or numeric kind.
///
/// The enum is closed over the six writable kinds, so every constructed
/// value has a valid code and a known byte width.
///
/// # Example
///
/// ```
/// use dtakit::schema::TypeCode;
///
/// let ty = TypeCode::parse("str10")?;
/// assert_eq!(ty, TypeCode::Str(10));
/// assert_eq!(ty.width(), 10);
/// assert_eq!(TypeCode::Double.width(), 8);
/// assert_eq!(TypeCode::Double.code(), 255);
/// # Ok::<(), dtakit::schema::SchemaError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCode {
    /// Fixed-length byte string; the width (1..=244) is the on-disk code
    Str(u8),
    /// 1-byte signed integer, code 251
    Byte,
    /// 2-byte signed integer, code 252
    Int,
    /// 4-byte signed integer, code 253
    Long,
    /// 4-byte IEEE float, code 254
    Float,
    /// 8-byte IEEE float, code 255
    Double,
}

impl TypeCode {
    /// Create a string type of the given width, validating the [1, 244] range.
    pub fn str_width(width: usize) -> Result<Self, SchemaError> {
        if width < 1 || width > MAX_STR_WIDTH as usize {
            return Err(SchemaError::StringWidthOutOfRange(width));
        }
        Ok(TypeCode::Str(width as u8))
    }

    /// Parse a type string: `strN` with 1 <= N <= 244, or one of
    /// `byte`, `int`, `long`, `float`, `double`.
    pub fn parse(s: &str) -> Result<Self, SchemaError> {
        if let Some(num) = s.strip_prefix("str") {
            let width: usize = num
                .parse()
                .map_err(|_| SchemaError::UnknownType(s.to_string()))?;
            return Self::str_width(width);
        }
        match s {
            "byte" => Ok(TypeCode::Byte),
            "int" => Ok(TypeCode::Int),
            "long" => Ok(TypeCode::Long),
            "float" => Ok(TypeCode::Float),
            "double" => Ok(TypeCode::Double),
            _ => Err(SchemaError::UnknownType(s.to_string())),
        }
    }

    /// Reconstruct a type from its on-disk code.
    pub fn from_code(code: u8) -> Result<Self, SchemaError> {
        match code {
            1..=MAX_STR_WIDTH => Ok(TypeCode::Str(code)),
            type_codes::BYTE => Ok(TypeCode::Byte),
            type_codes::INT => Ok(TypeCode::Int),
            type_codes::LONG => Ok(TypeCode::Long),
            type_codes::FLOAT => Ok(TypeCode::Float),
            type_codes::DOUBLE => Ok(TypeCode::Double),
            other => Err(SchemaError::InvalidCode(other)),
        }
    }

    /// The single-byte code stored in the descriptor type list.
    pub fn code(self) -> u8 {
        match self {
            TypeCode::Str(w) => w,
            TypeCode::Byte => type_codes::BYTE,
            TypeCode::Int => type_codes::INT,
            TypeCode::Long => type_codes::LONG,
            TypeCode::Float => type_codes::FLOAT,
            TypeCode::Double => type_codes::DOUBLE,
        }
    }

    /// Encoded width of one value in a record, in bytes.
    pub fn width(self) -> usize {
        match self {
            TypeCode::Str(w) => w as usize,
            TypeCode::Byte => 1,
            TypeCode::Int => 2,
            TypeCode::Long => 4,
            TypeCode::Float => 4,
            TypeCode::Double => 8,
        }
    }

    /// Default Stata display format: `%9.0g` for numeric kinds, `%Ns` for
    /// strings (Stata formats, not C printf formats).
    pub fn default_format(self) -> String {
        match self {
            TypeCode::Str(w) => format!("%{w}s"),
            _ => "%9.0g".to_string(),
        }
    }

    /// True for the five numeric kinds.
    pub fn is_numeric(self) -> bool {
        !matches!(self, TypeCode::Str(_))
    }
}

impl std::fmt::Display for TypeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeCode::Str(w) => write!(f, "str{w}"),
            TypeCode::Byte => f.write_str("byte"),
            TypeCode::Int => f.write_str("int"),
            TypeCode::Long => f.write_str("long"),
            TypeCode::Float => f.write_str("float"),
            TypeCode::Double => f.write_str("double"),
        }
    }
}
