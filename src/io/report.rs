//! Duplicate report emission and the human-facing summary

use crate::algorithm::duplicates::DuplicateReport;
use crate::io::error::Result;
use crate::io::metadata::{TableFormat, write_atomically};
use std::fmt;
use std::io::Write;
use std::path::Path;

/// The two counts surfaced to the user after a duplicate scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DuplicateSummary {
    /// Distinct assignments that occur more than once
    pub images_with_duplicates: usize,
    /// Extra copies that need their traits reassigned
    pub images_requiring_reassignment: usize,
}

impl From<&DuplicateReport<'_>> for DuplicateSummary {
    fn from(report: &DuplicateReport<'_>) -> Self {
        Self {
            images_with_duplicates: report.images_with_duplicates,
            images_requiring_reassignment: report.images_requiring_reassignment,
        }
    }
}

impl fmt::Display for DuplicateSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Duplicates exist for {} images",
            self.images_with_duplicates
        )?;
        write!(
            f,
            "Requiring re-assignment of {} images",
            self.images_requiring_reassignment
        )
    }
}

/// Render the report table: header, then each group followed by a blank row
///
/// # Errors
///
/// Returns a storage error if a row cannot be written
pub fn write_report_table(
    report: &DuplicateReport<'_>,
    header: &[&str],
    format: TableFormat,
    out: &mut dyn Write,
) -> Result<()> {
    {
        let mut writer = format.writer_builder().from_writer(&mut *out);
        writer.write_record(header)?;
        writer.flush()?;
    }

    for group in &report.groups {
        {
            let mut writer = format.writer_builder().from_writer(&mut *out);
            for record in group.records() {
                writer.write_record(record.fields())?;
            }
            writer.flush()?;
        }
        // Separator rows carry no fields, so they bypass the CSV writer
        out.write_all(b"\n")?;
    }

    Ok(())
}

/// Persist the duplicate report at `path`, replacing any previous report
///
/// # Errors
///
/// Returns a storage error if the report cannot be written or moved into place
pub fn write_report(
    report: &DuplicateReport<'_>,
    header: &[&str],
    path: &Path,
    format: TableFormat,
) -> Result<()> {
    write_atomically(path, |out| write_report_table(report, header, format, out))?;
    log::debug!(
        "Wrote {} duplicate groups to '{}'",
        report.groups.len(),
        path.display()
    );
    Ok(())
}
