//! Integration tests for dtakit
//!
//! These tests exercise the full pipeline from dataset assembly to the
//! finished file on disk, verifying the bytes the format consumer will see.

use std::fs;

use byteorder::{ByteOrder, LittleEndian};
use tempfile::tempdir;

use dtakit::dataset::Dataset;
use dtakit::field::ColumnData;
use dtakit::header::descriptors_len;
use dtakit::record::DtaRecord;
use dtakit::schema::{TypeCode, HEADER_LEN};
use dtakit::writer::WriteError;

/// Byte offset of the first record for a file with `n` variables.
fn data_start(n: usize) -> usize {
    HEADER_LEN + descriptors_len(n)
}

#[test]
fn bulk_columnar_file_on_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("small.dta");

    let mut ds = Dataset::new();
    ds.set_data_label("six column sample");
    ds.add_column("i8", "int8", ColumnData::Byte(vec![1, 2, 3, 4, 5, 6]))
        .unwrap();
    ds.add_column("i9", "int8", ColumnData::Byte(vec![1, 2, 3, 4, 5, 6]))
        .unwrap();
    ds.add_column(
        "i16",
        "int16",
        ColumnData::Int(vec![100, 200, 300, 400, 500, 600]),
    )
    .unwrap();
    ds.add_column(
        "i32",
        "int32",
        ColumnData::Long(vec![
            6_000_000, 7_000_000, 3_000_000, 4_000_000, 5_000_000, 6_000_000,
        ]),
    )
    .unwrap();
    ds.add_column(
        "f32",
        "float32",
        ColumnData::Float(vec![6.5, 7.5, 3.5, 4.5, 5.5, 6.5]),
    )
    .unwrap();
    ds.add_column(
        "f64",
        "float64",
        ColumnData::Double(vec![6.5, 7.5, 3.5, 4.5, 5.5, 6.5]),
    )
    .unwrap();

    let stats = ds.create(&path).unwrap();
    assert_eq!(stats.records_written, 6);
    assert_eq!(stats.record_size, 1 + 1 + 2 + 4 + 4 + 8);

    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len(), stats.file_size_bytes as usize);
    assert_eq!(bytes.len(), data_start(6) + 6 * 20);

    // header constants and counts
    assert_eq!(bytes[0], 113);
    assert_eq!(bytes[1], 2);
    assert_eq!(bytes[2], 1);
    assert_eq!(LittleEndian::read_i16(&bytes[4..6]), 6);
    assert_eq!(LittleEndian::read_i32(&bytes[6..10]), 6);
    assert_eq!(&bytes[10..27], b"six column sample");

    // recompute the observation count from the byte length, as a consumer
    // with no validation safety net effectively does
    let body = bytes.len() - data_start(6);
    assert_eq!(body % stats.record_size, 0);
    assert_eq!(body / stats.record_size, 6);

    // spot-check values across records
    let start = data_start(6);
    for (row, expected) in [6.5f64, 7.5, 3.5, 4.5, 5.5, 6.5].iter().enumerate() {
        let off = start + row * 20 + 12;
        assert_eq!(LittleEndian::read_f64(&bytes[off..off + 8]), *expected);
    }
    assert_eq!(bytes[start + 20], 2); // i8, second record
    assert_eq!(LittleEndian::read_i32(&bytes[start + 4 + 20..start + 8 + 20]), 7_000_000);
}

#[test]
fn streaming_file_on_disk_with_finalize() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("two_records.dta");

    let mut ds = Dataset::new();
    ds.add_field_meta("bytefld", "byte field", TypeCode::Byte);
    ds.add_field_meta("intfld", "int field", TypeCode::Int);
    ds.add_field_meta("str9fld", "str 9 field", TypeCode::Str(9));
    ds.add_field_meta("doublefld", "double field", TypeCode::Double);

    let mut w = ds.begin_write_path(&path).unwrap();
    w.append_byte(1).unwrap();
    w.append_int(999).unwrap();
    w.append_str("123456789", 9).unwrap();
    w.append_double(6.284).unwrap();
    w.commit_record().unwrap();

    w.append_byte(2).unwrap();
    w.append_int(9999).unwrap();
    w.append_str("1234567\0\0", 9).unwrap();
    w.append_double(3.142).unwrap();
    w.commit_record().unwrap();

    let stats = w.end_write().unwrap();
    assert_eq!(stats.records_written, 2);

    let bytes = fs::read(&path).unwrap();
    assert_eq!(LittleEndian::read_i16(&bytes[4..6]), 4);
    assert_eq!(LittleEndian::read_i32(&bytes[6..10]), 2);

    let start = data_start(4);
    assert_eq!(&bytes[start + 3..start + 12], b"123456789");
    assert_eq!(&bytes[start + 20 + 3..start + 20 + 12], b"1234567\0\0");
    assert_eq!(
        LittleEndian::read_f64(&bytes[start + 20 + 12..start + 20 + 20]),
        3.142
    );
}

#[test]
fn empty_session_still_declares_schema() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty_records.dta");

    let mut ds = Dataset::new();
    ds.add_field_meta("bytefld", "byte field", TypeCode::Byte);
    ds.add_field_meta("doublefld", "double field", TypeCode::Double);

    let w = ds.begin_write_path(&path).unwrap();
    let stats = w.end_write().unwrap();
    assert_eq!(stats.records_written, 0);

    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len(), data_start(2));
    assert_eq!(LittleEndian::read_i16(&bytes[4..6]), 2);
    assert_eq!(LittleEndian::read_i32(&bytes[6..10]), 0);
    assert_eq!(bytes[HEADER_LEN], 251);
    assert_eq!(bytes[HEADER_LEN + 1], 255);
}

#[test]
fn zero_field_dataset_writes_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nothing.dta");

    let ds = Dataset::new();
    let err = ds.create(&path).unwrap_err();
    assert!(matches!(err, WriteError::NoFields));
    // the file was created by the sink, but carries no bytes
    assert_eq!(fs::metadata(&path).unwrap().len(), 0);
}

dtakit::dta_record! {
    struct Person {
        name: String => { name: "my_name", label: "My Name", typ: "str10" },
        age: i16 => { label: "Age in Years" },
        height: f64 => { label: "Height (meters)", format: "%6.2f" },
        valid: i8,
    }
}

#[test]
fn record_extraction_to_finished_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fromstruct.dta");

    let template = Person {
        name: String::new(),
        age: 0,
        height: 0.0,
        valid: 0,
    };
    let fields = template.dta_fields().unwrap();
    assert_eq!(fields.len(), 4);
    assert_eq!(fields[0].name, "my_name");
    assert_eq!(fields[0].ty, TypeCode::Str(10));
    assert_eq!(fields[1].ty, TypeCode::Int);
    assert_eq!(fields[1].label, "Age in Years");
    assert_eq!(fields[2].format, "%6.2f");
    assert_eq!(fields[3].ty, TypeCode::Byte);

    let ds = Dataset::from_record(&template).unwrap();
    assert_eq!(ds.record_size(), 10 + 2 + 8 + 1);

    let mut w = ds.begin_write_path(&path).unwrap();
    w.append_str("ada\0", 10).unwrap();
    w.append_int(36).unwrap();
    w.append_double(1.70).unwrap();
    w.append_byte(1).unwrap();
    w.commit_record().unwrap();
    let stats = w.end_write().unwrap();
    assert_eq!(stats.records_written, 1);

    let bytes = fs::read(&path).unwrap();
    assert_eq!(LittleEndian::read_i32(&bytes[6..10]), 1);
    // descriptor name slot carries the tag-resolved name
    assert_eq!(&bytes[HEADER_LEN + 4..HEADER_LEN + 4 + 7], b"my_name");

    let start = data_start(4);
    assert_eq!(&bytes[start..start + 4], b"ada\0");
    assert_eq!(LittleEndian::read_i16(&bytes[start + 10..start + 12]), 36);
}

#[test]
fn large_streamed_file_has_exact_length() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("large.dta");

    let mut ds = Dataset::new();
    ds.add_field_meta("f64", "float64", TypeCode::Double);

    let n = 100_000usize;
    let mut w = ds.begin_write_path(&path).unwrap();
    for i in 0..n {
        w.append_double(i as f64 * 0.001).unwrap();
        w.commit_record().unwrap();
    }
    let stats = w.end_write().unwrap();
    assert_eq!(stats.records_written, n);

    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len(), data_start(1) + n * 8);
    assert_eq!(LittleEndian::read_i32(&bytes[6..10]), n as i32);
    // last record
    let last = bytes.len() - 8;
    assert_eq!(
        LittleEndian::read_f64(&bytes[last..]),
        (n - 1) as f64 * 0.001
    );
}
