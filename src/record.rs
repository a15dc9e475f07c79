//! # Struct Extraction Adapter
//!
//! Derives an ordered sequence of [`Field`]s from an annotated record
//! struct, so a dataset's schema can be declared next to the data it
//! describes. Rust has no runtime reflection, so the declaration happens
//! through the [`dta_record!`] macro, which implements [`DtaRecord`] for a
//! struct and forwards each field's tag options to the runtime extraction
//! rules in [`extract_fields`]:
//!
//! - `name` defaults to the lowercased field identifier
//! - `label` defaults to the resolved name
//! - `typ` is an explicit type string (`str10`, `byte`, `int`, `long`,
//!   `float`, `double`); when absent the type is inferred from the field's
//!   in-memory kind (i8 -> byte, i16 -> int, i32/i64 -> long, f32 -> float,
//!   f64 -> double). Text fields carry no width and always require an
//!   explicit `typ`.
//! - `format` is a free-form display string, empty by default
//!
//! ```
//! use dtakit::dta_record;
//! use dtakit::record::DtaRecord;
//! use dtakit::schema::TypeCode;
//!
//! dta_record! {
//!     struct Person {
//!         name: String => { typ: "str10", label: "Full Name" },
//!         age: i16,
//!         height: f64 => { format: "%6.2f" },
//!     }
//! }
//!
//! let p = Person { name: "Ada".into(), age: 36, height: 1.7 };
//! let fields = p.dta_fields()?;
//! assert_eq!(fields[0].ty, TypeCode::Str(10));
//! assert_eq!(fields[1].ty, TypeCode::Int);
//! assert_eq!(fields[2].format, "%6.2f");
//! # Ok::<(), dtakit::record::ExtractError>(())
//! ```

use crate::field::{Field, FieldData, ScalarValue};
use crate::schema::{SchemaError, TypeCode};

/// Errors from field extraction
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The `typ` option did not name a valid type
    #[error("field {attr}: {source}")]
    BadType {
        /// Struct field identifier
        attr: String,
        /// Underlying type-parse failure
        #[source]
        source: SchemaError,
    },

    /// The field's in-memory kind has no inferable on-disk type
    #[error("field {attr}: cannot infer a column type for {kind}; an explicit typ is required")]
    Inference {
        /// Struct field identifier
        attr: String,
        /// In-memory kind name
        kind: &'static str,
    },

    /// Extraction produced zero fields
    #[error("no fields found")]
    NoFields,
}

/// Tag options attached to one struct field by [`dta_record!`].
#[derive(Debug, Clone, Default)]
pub struct AttrTag {
    /// Explicit variable name
    pub name: Option<String>,
    /// Explicit variable label
    pub label: Option<String>,
    /// Explicit type string
    pub typ: Option<String>,
    /// Explicit display format
    pub format: Option<String>,
}

/// One struct attribute: identifier, tag options, and current value.
#[derive(Debug, Clone)]
pub struct Attr {
    /// Field identifier as written in the struct
    pub ident: &'static str,
    /// Tag options from the declaration
    pub tag: AttrTag,
    /// The field's value in the inspected instance
    pub value: ScalarValue,
}

/// A record type whose fields map to dataset columns.
///
/// Implemented by [`dta_record!`]; the attribute order is the struct's
/// declaration order and becomes the column order of the file.
pub trait DtaRecord {
    /// The record's attributes, in declaration order.
    fn dta_attrs(&self) -> Vec<Attr>;

    /// Extract column metadata from this record instance.
    fn dta_fields(&self) -> Result<Vec<Field>, ExtractError> {
        extract_fields(self.dta_attrs())
    }
}

/// Infer the on-disk type from an in-memory kind.
fn infer_type(attr: &str, value: &ScalarValue) -> Result<TypeCode, ExtractError> {
    match value {
        ScalarValue::I8(_) => Ok(TypeCode::Byte),
        ScalarValue::I16(_) => Ok(TypeCode::Int),
        ScalarValue::I32(_) | ScalarValue::I64(_) => Ok(TypeCode::Long),
        ScalarValue::F32(_) => Ok(TypeCode::Float),
        ScalarValue::F64(_) => Ok(TypeCode::Double),
        ScalarValue::Str(_) => Err(ExtractError::Inference {
            attr: attr.to_string(),
            kind: value.kind_name(),
        }),
    }
}

/// Apply the defaulting rules to a sequence of attributes.
///
/// Fails with [`ExtractError::NoFields`] on an empty sequence; every
/// produced [`Field`] carries the attribute's value as scalar data.
pub fn extract_fields(attrs: Vec<Attr>) -> Result<Vec<Field>, ExtractError> {
    let mut fields = Vec::with_capacity(attrs.len());
    for attr in attrs {
        let name = match attr.tag.name {
            Some(n) => n,
            None => attr.ident.to_lowercase(),
        };
        let label = attr.tag.label.unwrap_or_else(|| name.clone());
        let ty = match &attr.tag.typ {
            Some(t) => TypeCode::parse(t).map_err(|source| ExtractError::BadType {
                attr: attr.ident.to_string(),
                source,
            })?,
            None => infer_type(attr.ident, &attr.value)?,
        };
        let format = attr.tag.format.unwrap_or_default();
        fields.push(Field {
            name,
            ty,
            label,
            format,
            data: FieldData::Scalar(attr.value),
        });
    }
    if fields.is_empty() {
        return Err(ExtractError::NoFields);
    }
    Ok(fields)
}

/// Declare a record struct and implement [`DtaRecord`] for it.
///
/// Each field may carry a `=> { key: value, ... }` tag list with any of
/// `name`, `label`, `typ`, and `format`. Untagged fields fall back to the
/// inferred defaults.
///
/// ```
/// dtakit::dta_record! {
///     /// One survey response.
///     pub struct Response {
///         respondent: String => { typ: "str10" },
///         score: i8,
///     }
/// }
/// ```
#[macro_export]
macro_rules! dta_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $fname:ident : $fty:ty $(=> { $($key:ident : $val:expr),* $(,)? })?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $fname: $fty,
            )*
        }

        impl $crate::record::DtaRecord for $name {
            fn dta_attrs(&self) -> ::std::vec::Vec<$crate::record::Attr> {
                ::std::vec![
                    $(
                        $crate::record::Attr {
                            ident: ::core::stringify!($fname),
                            tag: $crate::dta_tag!($($($key : $val),*)?),
                            value: $crate::field::ScalarValue::from(
                                ::core::clone::Clone::clone(&self.$fname),
                            ),
                        },
                    )*
                ]
            }
        }
    };
}

/// Build an [`AttrTag`] from a `key: value` list. Internal to
/// [`dta_record!`].
#[doc(hidden)]
#[macro_export]
macro_rules! dta_tag {
    (@set $tag:ident, name, $val:expr) => {
        $tag.name = ::core::option::Option::Some(($val).to_string())
    };
    (@set $tag:ident, label, $val:expr) => {
        $tag.label = ::core::option::Option::Some(($val).to_string())
    };
    (@set $tag:ident, typ, $val:expr) => {
        $tag.typ = ::core::option::Option::Some(($val).to_string())
    };
    (@set $tag:ident, format, $val:expr) => {
        $tag.format = ::core::option::Option::Some(($val).to_string())
    };
    ($($key:ident : $val:expr),*) => {{
        #[allow(unused_mut)]
        let mut tag = <$crate::record::AttrTag as ::core::default::Default>::default();
        $( $crate::dta_tag!(@set tag, $key, $val); )*
        tag
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldData;

    crate::dta_record! {
        struct AllTags {
            a: String => { name: "Alpha", label: "First Field", typ: "str10", format: "%9s" },
            b: i16 => { typ: "int" },
            c: f64 => { label: "Currency", typ: "double", format: "%.2f" },
        }
    }

    #[test]
    fn all_tags() {
        let s = AllTags {
            a: "hello".to_string(),
            b: 42,
            c: 3.14159,
        };
        let fields = s.dta_fields().unwrap();
        assert_eq!(fields.len(), 3);

        let a = &fields[0];
        assert_eq!(a.name, "Alpha");
        assert_eq!(a.label, "First Field");
        assert_eq!(a.ty, TypeCode::Str(10));
        assert_eq!(a.format, "%9s");
        assert_eq!(
            a.data(),
            &FieldData::Scalar(ScalarValue::Str("hello".to_string()))
        );

        assert_eq!(fields[1].ty, TypeCode::Int);
        assert_eq!(fields[2].ty, TypeCode::Double);
        assert_eq!(fields[2].label, "Currency");
    }

    crate::dta_record! {
        #[allow(non_snake_case)]
        struct MixedCase {
            Score: i8,
        }
    }

    #[test]
    fn name_and_label_default_to_lowercased_ident() {
        let s = MixedCase { Score: 1 };
        let fields = s.dta_fields().unwrap();
        assert_eq!(fields[0].name, "score");
        assert_eq!(fields[0].label, "score");
        assert_eq!(fields[0].ty, TypeCode::Byte);
        assert_eq!(fields[0].format, "");
    }

    crate::dta_record! {
        struct Inferred {
            a: i8,
            b: i16,
            c: i32,
            d: i64,
            e: f32,
            f: f64,
        }
    }

    #[test]
    fn numeric_kind_inference() {
        let s = Inferred {
            a: 0,
            b: 0,
            c: 0,
            d: 0,
            e: 0.0,
            f: 0.0,
        };
        let tys: Vec<TypeCode> = s.dta_fields().unwrap().iter().map(|f| f.ty).collect();
        assert_eq!(
            tys,
            vec![
                TypeCode::Byte,
                TypeCode::Int,
                TypeCode::Long,
                TypeCode::Long,
                TypeCode::Float,
                TypeCode::Double,
            ]
        );
    }

    crate::dta_record! {
        struct BareText {
            z: String,
        }
    }

    #[test]
    fn text_without_typ_fails() {
        let s = BareText {
            z: "test".to_string(),
        };
        let err = s.dta_fields().unwrap_err();
        assert!(matches!(err, ExtractError::Inference { ref attr, .. } if attr == "z"));
    }

    crate::dta_record! {
        struct BadTyp {
            y: i16 => { typ: "int128" },
        }
    }

    #[test]
    fn unknown_typ_fails() {
        let s = BadTyp { y: 1 };
        let err = s.dta_fields().unwrap_err();
        assert!(matches!(err, ExtractError::BadType { ref attr, .. } if attr == "y"));
    }

    crate::dta_record! {
        struct Nothing {}
    }

    #[test]
    fn zero_fields_fails() {
        let err = Nothing {}.dta_fields().unwrap_err();
        assert!(matches!(err, ExtractError::NoFields));
    }
}
