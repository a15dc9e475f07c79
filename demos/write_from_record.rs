//! Derive a dataset schema from an annotated record struct.
//!
//! Run with: `cargo run --example write_from_record`

use anyhow::Result;

use dtakit::dataset::Dataset;

dtakit::dta_record! {
    struct Participant {
        name: String => { typ: "str20", label: "Participant name" },
        age: i16 => { label: "Age in years" },
        height: f64 => { label: "Height (m)", format: "%6.2f" },
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let template = Participant {
        name: String::new(),
        age: 0,
        height: 0.0,
    };
    let ds = Dataset::from_record(&template)?;

    let rows = [("ada\0", 36i16, 1.70), ("grace\0", 45, 1.62)];
    let mut w = ds.begin_write_path("participants.dta")?;
    for (name, age, height) in rows {
        w.append_str(name, 20)?;
        w.append_int(age)?;
        w.append_double(height)?;
        w.commit_record()?;
    }
    let stats = w.end_write()?;
    println!("{stats}");

    Ok(())
}
