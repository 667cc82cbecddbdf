//! Tests for trait definition validation and schema capacity

#[cfg(test)]
mod tests {
    use layerforge::CollectionError;
    use layerforge::model::{TraitDefinition, TraitSchema};

    fn background() -> TraitDefinition {
        TraitDefinition::new("Background", ["Bat", "Basket", "Anya"], [40, 40, 20])
    }

    // Tests a well-formed schema keeps its order
    // Verified by sorting traits during construction
    #[test]
    fn test_schema_preserves_order() -> layerforge::Result<()> {
        let schema = TraitSchema::new(vec![
            background(),
            TraitDefinition::new("Eyes", ["Blue", "Green"], [1, 1]),
        ])?;

        assert_eq!(schema.trait_names(), vec!["Background", "Eyes"]);
        assert_eq!(schema.index_of("Eyes"), Some(1));
        assert_eq!(schema.index_of("Mouth"), None);
        assert_eq!(schema.len(), 2);
        Ok(())
    }

    // Tests mismatched variant and weight counts are rejected
    // Verified by removing the length comparison
    #[test]
    fn test_length_mismatch_is_configuration_error() {
        let result = TraitSchema::new(vec![TraitDefinition::new(
            "Background",
            ["Bat", "Basket"],
            [40],
        )]);

        let Err(err) = result else {
            unreachable!("mismatched weights must be rejected");
        };
        assert!(err.is_configuration_error());
        assert!(err.to_string().contains("2 variants but 1 weights"));
    }

    // Tests zero weights are rejected with the variant named
    // Verified by allowing zero weights
    #[test]
    fn test_zero_weight_rejected() {
        let result = TraitSchema::new(vec![TraitDefinition::new(
            "Eyes",
            ["Blue", "Green"],
            [5, 0],
        )]);

        match result {
            Err(CollectionError::InvalidSchema { trait_name, reason }) => {
                assert_eq!(trait_name.as_deref(), Some("Eyes"));
                assert!(reason.contains("Green"));
            }
            other => unreachable!("Expected InvalidSchema, got {other:?}"),
        }
    }

    // Tests structural schema problems
    // Verified by skipping each check in turn
    #[test]
    fn test_structural_violations() {
        assert!(TraitSchema::new(vec![]).is_err(), "empty schema");
        assert!(
            TraitSchema::new(vec![TraitDefinition::new("Eyes", Vec::<String>::new(), Vec::<u32>::new())])
                .is_err(),
            "trait without variants"
        );
        assert!(
            TraitSchema::new(vec![background(), background()]).is_err(),
            "duplicate trait names"
        );
        assert!(
            TraitSchema::new(vec![TraitDefinition::new("File", ["a"], [1])]).is_err(),
            "reserved identifier column"
        );
        assert!(
            TraitSchema::new(vec![TraitDefinition::new("  ", ["a"], [1])]).is_err(),
            "blank trait name"
        );
    }

    // Tests capacity counts distinct variants only
    // Verified by using the raw variant count
    #[test]
    fn test_capacity_counts_distinct_variants() -> layerforge::Result<()> {
        let schema = TraitSchema::new(vec![
            background(),
            TraitDefinition::new("Eyes", ["Blue", "Blue", "Green"], [1, 1, 1]),
        ])?;

        assert_eq!(schema.capacity(), 6);
        Ok(())
    }

    // Tests capacity saturates instead of overflowing
    // Verified by using unchecked multiplication
    #[test]
    fn test_capacity_saturates() -> layerforge::Result<()> {
        let variants: Vec<String> = (0..1000).map(|i| format!("v{i}")).collect();
        let traits = (0..20)
            .map(|t| TraitDefinition::new(format!("t{t}"), variants.clone(), vec![1; 1000]))
            .collect();
        let schema = TraitSchema::new(traits)?;

        assert_eq!(schema.capacity(), u128::MAX);
        Ok(())
    }
}
