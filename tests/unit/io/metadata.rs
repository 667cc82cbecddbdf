//! Tests for metadata table persistence, quoting and row validation

#[cfg(test)]
mod tests {
    use layerforge::CollectionError;
    use layerforge::io::metadata::{MetadataReader, TableFormat, read_metadata, write_metadata};
    use layerforge::model::{MetadataTable, Record, TraitAssignment};
    use std::fs;

    fn table(rows: &[&[&str]]) -> MetadataTable {
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, values)| Record::at_position(i, values.iter().copied().collect::<TraitAssignment>()))
            .collect();
        MetadataTable::new(vec!["Background".to_string(), "Eyes".to_string()], records)
    }

    // Tests write then read yields equal records, including delimiter and quote characters
    // Verified by writing with QuoteStyle::Never
    #[test]
    fn test_round_trip_with_delimiters_in_values() -> layerforge::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("metadata.csv");
        let original = table(&[
            &["Red, dark", "Open"],
            &["Blue", "say \"hi\""],
            &["Green", "two\nlines"],
        ]);

        write_metadata(&original, &path, TableFormat::default())?;
        let loaded = read_metadata(&path, TableFormat::default())?;

        assert_eq!(loaded, original);
        Ok(())
    }

    // Tests the written header and plain rows
    // Verified by emitting the header after the rows
    #[test]
    fn test_written_layout() -> layerforge::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("metadata.csv");

        write_metadata(&table(&[&["Red", "Open"]]), &path, TableFormat::default())?;

        assert_eq!(fs::read_to_string(&path)?, "File,Background,Eyes\n1.png,Red,Open\n");
        Ok(())
    }

    // Tests a custom delimiter and quote round-trip
    // Verified by ignoring the configured quote
    #[test]
    fn test_custom_format_round_trip() -> layerforge::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("metadata.csv");
        let format = TableFormat::new(';', '|')?;
        let original = table(&[&["Red;dark", "Open"], &["Blue", "Closed"]]);

        write_metadata(&original, &path, format)?;
        let text = fs::read_to_string(&path)?;

        assert!(text.contains("|Red;dark|"));
        assert_eq!(read_metadata(&path, format)?, original);
        Ok(())
    }

    // Tests invalid delimiter and quote combinations
    // Verified by accepting multi-byte characters
    #[test]
    fn test_invalid_formats() {
        assert!(TableFormat::new(',', ',').is_err());
        assert!(TableFormat::new('é', '"').is_err());
        assert!(TableFormat::new('\n', '"').is_err());
        assert!(TableFormat::new('\t', '\'').is_ok());
    }

    // Tests each malformed row is reported with its line while good rows still parse
    // Verified by silently skipping short rows
    #[test]
    fn test_malformed_rows_surface_individually() -> layerforge::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("metadata.csv");
        fs::write(
            &path,
            "File,Background,Eyes\n1.png,Red,Open\n2.png,Red\n3.png,Blue,Open\n4.png,a,b,c\n",
        )?;

        let rows: Vec<_> = MetadataReader::open(&path, TableFormat::default())?.collect();

        assert_eq!(rows.len(), 4);
        assert!(rows[0].is_ok());
        assert!(rows[2].is_ok());
        match &rows[1] {
            Err(CollectionError::MalformedRecord {
                line,
                expected,
                found,
                ..
            }) => {
                assert_eq!((*line, *expected, *found), (3, 3, 2));
            }
            other => unreachable!("Expected MalformedRecord, got {other:?}"),
        }
        assert!(matches!(
            rows[3],
            Err(CollectionError::MalformedRecord { found: 4, .. })
        ));

        assert!(read_metadata(&path, TableFormat::default()).is_err());
        Ok(())
    }

    // Tests header validation
    // Verified by accepting any first column
    #[test]
    fn test_malformed_header() -> layerforge::Result<()> {
        let dir = tempfile::tempdir()?;
        let wrong_first = dir.path().join("wrong.csv");
        let no_traits = dir.path().join("bare.csv");
        let empty = dir.path().join("empty.csv");
        fs::write(&wrong_first, "Name,Background\n1.png,Red\n")?;
        fs::write(&no_traits, "File\n1.png\n")?;
        fs::write(&empty, "")?;

        for path in [&wrong_first, &no_traits, &empty] {
            assert!(
                matches!(
                    MetadataReader::open(path, TableFormat::default()),
                    Err(CollectionError::MalformedHeader { .. })
                ),
                "{}",
                path.display()
            );
        }
        Ok(())
    }

    // Tests blank separator lines are not treated as records
    // Verified by reading blank lines as empty rows
    #[test]
    fn test_blank_lines_skipped() -> layerforge::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("report.csv");
        fs::write(&path, "File,Background\n1.png,Red\n2.png,Red\n\n")?;

        let loaded = read_metadata(&path, TableFormat::default())?;

        assert_eq!(loaded.records().len(), 2);
        Ok(())
    }

    // Tests a failed write leaves no table behind
    // Verified by writing directly to the destination
    #[test]
    fn test_failed_write_leaves_nothing() -> layerforge::Result<()> {
        let dir = tempfile::tempdir()?;
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, "file")?;
        let path = blocker.join("metadata.csv");

        assert!(write_metadata(&table(&[&["Red", "Open"]]), &path, TableFormat::default()).is_err());
        assert!(!path.exists());
        Ok(())
    }
}
