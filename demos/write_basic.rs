//! Write a small two-column dataset in both modes.
//!
//! Run with: `cargo run --example write_basic`

use anyhow::Result;

use dtakit::dataset::Dataset;
use dtakit::field::ColumnData;
use dtakit::schema::TypeCode;

fn main() -> Result<()> {
    env_logger::init();

    // Bulk mode: attach whole columns, write in one pass.
    let mut ds = Dataset::new();
    ds.set_data_label("temperature readings");
    ds.add_column(
        "station",
        "Station id",
        ColumnData::Long(vec![101, 102, 103]),
    )?;
    ds.add_column(
        "temp",
        "Temperature (C)",
        ColumnData::Double(vec![21.5, 19.25, 23.75]),
    )?;
    let stats = ds.create("bulk.dta")?;
    println!("bulk: {stats}");

    // Streaming mode: declare fields, append row by row, finalize.
    let mut ds = Dataset::new();
    ds.add_field_meta("station", "Station id", TypeCode::Long);
    ds.add_field_meta("temp", "Temperature (C)", TypeCode::Double);

    let mut w = ds.begin_write_path("streamed.dta")?;
    for (station, temp) in [(101, 21.5), (102, 19.25), (103, 23.75)] {
        w.append_long(station)?;
        w.append_double(temp)?;
        w.commit_record()?;
    }
    let stats = w.end_write()?;
    println!("streamed: {stats}");

    Ok(())
}
