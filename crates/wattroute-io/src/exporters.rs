//! Row writers for command output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use wattroute_core::{WattError, WattResult};

/// Write `rows` as a pretty-printed JSON array.
pub fn write_json<T: Serialize>(rows: &[T], writer: impl Write) -> WattResult<()> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, rows)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write flat `rows` as CSV with a header row taken from the field names.
pub fn write_csv<T: Serialize>(rows: &[T], writer: impl Write) -> WattResult<()> {
    let mut table = csv::Writer::from_writer(writer);
    for row in rows {
        table.serialize(row).map_err(csv_error)?;
    }
    table.flush()?;
    Ok(())
}

/// Write `rows` to `path`, as CSV when the extension is `.csv` and JSON otherwise.
pub fn write_rows<T: Serialize>(rows: &[T], path: impl AsRef<Path>) -> WattResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        write_csv(rows, file)
    } else {
        write_json(rows, file)
    }
}

fn csv_error(err: csv::Error) -> WattError {
    WattError::Parse(format!("csv: {err}"))
}
