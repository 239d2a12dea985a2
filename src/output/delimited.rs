//! Pipe-delimited dump writer

use crate::output::traits::{OutputError, OutputResult, RecordSink};
use crate::output::ListingRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Field separator of the dump file
pub const DELIMITER: char = '|';

/// Column names, in order
pub const HEADER: [&str; 3] = ["business_name", "location", "phone"];

const LINE_TERMINATOR: &str = "\r\n";

/// Writes records as `|`-separated rows with every field quoted
pub struct DelimitedWriter<W: Write> {
    inner: W,
}

impl<W: Write> DelimitedWriter<W> {
    /// Wraps `inner` and writes the header row
    pub fn new(mut inner: W) -> OutputResult<Self> {
        write_row(&mut inner, &HEADER)?;
        inner.flush()?;
        Ok(Self { inner })
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> RecordSink for DelimitedWriter<W> {
    fn write_batch(&mut self, records: &[ListingRecord]) -> OutputResult<()> {
        for record in records {
            write_row(&mut self.inner, &record.fields())?;
        }
        self.inner.flush()?;
        Ok(())
    }
}

fn write_row<W: Write>(w: &mut W, fields: &[&str]) -> std::io::Result<()> {
    let mut first = true;
    for field in fields {
        if !first {
            write!(w, "{}", DELIMITER)?;
        } else {
            first = false;
        }
        write!(w, "\"{}\"", field.replace('"', "\"\""))?;
    }
    write!(w, "{}", LINE_TERMINATOR)
}

/// Creates `<dir>/<prefix>_<YYYY_MM_DD_HH_MM_SS>.csv` and writes its header
///
/// # Returns
///
/// * `Ok((path, writer))` - The new dump file
/// * `Err(OutputError::DirectoryMissing)` - `dir` does not exist
pub fn open_output_file(
    dir: &Path,
    prefix: &str,
) -> OutputResult<(PathBuf, DelimitedWriter<BufWriter<File>>)> {
    if !dir.is_dir() {
        return Err(OutputError::DirectoryMissing(dir.to_path_buf()));
    }

    let timestamp = chrono::Local::now().format("%Y_%m_%d_%H_%M_%S");
    let path = dir.join(format!("{}_{}.csv", prefix, timestamp));
    let file = File::create(&path)?;
    let writer = DelimitedWriter::new(BufWriter::new(file))?;

    tracing::info!("Writing listings to {}", path.display());
    Ok((path, writer))
}
