//! Tests for collection constants and defaults

#[cfg(test)]
mod tests {
    use layerforge::io::configuration::{
        DEFAULT_DELIMITER, DEFAULT_IMAGE_COUNT, DEFAULT_MAX_ATTEMPTS, DEFAULT_QUOTE,
        DEFAULT_SEED, FILE_COLUMN, IMAGE_EXTENSION, METADATA_FILE_NAME, STAGING_PREFIX,
    };

    // Tests the identifier column name is fixed
    // Verified by renaming the column
    #[test]
    fn test_file_column() {
        assert_eq!(FILE_COLUMN, "File");
    }

    // Tests delimiter and quote defaults differ and are ASCII
    // Verified by setting both to the same character
    #[test]
    fn test_table_defaults() {
        assert_eq!(DEFAULT_DELIMITER, ',');
        assert_eq!(DEFAULT_QUOTE, '"');
        assert_ne!(DEFAULT_DELIMITER, DEFAULT_QUOTE);
    }

    // Tests generation defaults
    // Verified by changing default values
    #[test]
    fn test_generation_defaults() {
        assert_eq!(DEFAULT_SEED, 42);
        assert_eq!(DEFAULT_IMAGE_COUNT, 10);
        assert!(DEFAULT_MAX_ATTEMPTS >= 1_000);
    }

    // Tests file names are filesystem safe
    // Verified by adding a path separator
    #[test]
    fn test_file_names_have_no_separators() {
        for name in [IMAGE_EXTENSION, METADATA_FILE_NAME, STAGING_PREFIX] {
            assert!(!name.contains('/') && !name.contains('\\'), "{name}");
        }
        assert!(METADATA_FILE_NAME.ends_with(".csv"));
        assert!(STAGING_PREFIX.starts_with('.'));
    }
}
