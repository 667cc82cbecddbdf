//! Tests for unique weighted combination generation

#[cfg(test)]
mod tests {
    use layerforge::CollectionError;
    use layerforge::algorithm::generator::{CombinationGenerator, all_unique, generate};
    use layerforge::model::{Record, TraitDefinition, TraitSchema};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn three_by_three() -> layerforge::Result<TraitSchema> {
        TraitSchema::new(vec![
            TraitDefinition::new("Background", ["Bat", "Basket", "Anya"], [40, 40, 20]),
            TraitDefinition::new("Base", ["Bat", "Basket", "Anya"], [40, 40, 20]),
            TraitDefinition::new("Eyes", ["Bat", "Basket", "Anya"], [40, 40, 20]),
        ])
    }

    // Tests exactly count records with distinct assignments and dense identifiers
    // Verified by skipping the uniqueness check on acceptance
    #[test]
    fn test_generate_unique_dense_records() -> layerforge::Result<()> {
        let schema = three_by_three()?;
        let mut rng = StdRng::seed_from_u64(42);

        let records = generate(&schema, 20, &mut rng)?;

        assert_eq!(records.len(), 20);
        assert!(all_unique(&records));
        let assignments: HashSet<_> = records.iter().map(|r| &r.assignment).collect();
        assert_eq!(assignments.len(), 20);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.file, format!("{}.png", i + 1));
            assert_eq!(record.assignment.len(), schema.len());
        }
        Ok(())
    }

    // Tests the full combination space can be exhausted exactly
    // Verified by using a capacity check of count >= capacity
    #[test]
    fn test_generate_entire_capacity() -> layerforge::Result<()> {
        let schema = three_by_three()?;
        let mut rng = StdRng::seed_from_u64(5);

        let records = generate(&schema, 27, &mut rng)?;

        assert_eq!(records.len(), 27);
        assert!(all_unique(&records));
        Ok(())
    }

    // Tests every sampled variant belongs to its trait
    // Verified by sampling variants from the wrong trait
    #[test]
    fn test_variants_come_from_their_trait() -> layerforge::Result<()> {
        let schema = TraitSchema::new(vec![
            TraitDefinition::new("Background", ["Red", "Blue"], [1, 1]),
            TraitDefinition::new("Eyes", ["Open", "Closed", "Wink"], [1, 2, 3]),
        ])?;
        let mut rng = StdRng::seed_from_u64(9);

        for record in generate(&schema, 6, &mut rng)? {
            for (definition, value) in schema.traits().iter().zip(record.assignment.values()) {
                assert!(definition.variants.contains(value));
            }
        }
        Ok(())
    }

    // Tests same seed produces the same collection
    // Verified by seeding from entropy
    #[test]
    fn test_generation_is_deterministic_for_seed() -> layerforge::Result<()> {
        let schema = three_by_three()?;

        let first = generate(&schema, 15, &mut StdRng::seed_from_u64(77))?;
        let second = generate(&schema, 15, &mut StdRng::seed_from_u64(77))?;

        assert_eq!(first, second);
        Ok(())
    }

    // Tests requests beyond capacity fail before sampling
    // Verified by removing the capacity check (the test would stall instead)
    #[test]
    fn test_capacity_exhausted() -> layerforge::Result<()> {
        let schema = three_by_three()?;
        let mut generator = CombinationGenerator::new(&schema, StdRng::seed_from_u64(1));

        match generator.generate(28) {
            Err(CollectionError::CapacityExhausted {
                requested,
                capacity,
            }) => {
                assert_eq!(requested, 28);
                assert_eq!(capacity, 27);
            }
            other => unreachable!("Expected CapacityExhausted, got {other:?}"),
        }
        assert_eq!(generator.stats.draws, 0);
        Ok(())
    }

    // Tests capacity accounts for records already emitted by the instance
    // Verified by comparing only the new count against capacity
    #[test]
    fn test_capacity_includes_previous_records() -> layerforge::Result<()> {
        let schema = three_by_three()?;
        let mut generator = CombinationGenerator::new(&schema, StdRng::seed_from_u64(1));

        let first = generator.generate(20)?;
        assert!(generator.generate(8).is_err());
        let rest = generator.generate(7)?;

        assert_eq!(generator.emitted(), 27);
        assert_eq!(rest.first().map(|r| r.file.as_str()), Some("21.png"));
        let combined: Vec<Record> = first.into_iter().chain(rest).collect();
        assert!(all_unique(&combined));
        Ok(())
    }

    // Tests the retry ceiling turns an unlucky draw into GenerationStalled
    // Verified by looping without a ceiling
    #[test]
    fn test_generation_stalled_with_tiny_ceiling() -> layerforge::Result<()> {
        // One variant dominates, so the last free combination is almost never drawn
        let schema = TraitSchema::new(vec![TraitDefinition::new(
            "Background",
            ["Common", "Rare"],
            [1_000_000, 1],
        )])?;
        let mut generator =
            CombinationGenerator::new(&schema, StdRng::seed_from_u64(3)).with_max_attempts(1);

        let mut outcome = Ok(Vec::new());
        for _ in 0..2 {
            outcome = generator.generate(1);
            if outcome.is_err() {
                break;
            }
        }

        match outcome {
            Err(CollectionError::GenerationStalled { record, attempts }) => {
                assert_eq!(record, 2);
                assert_eq!(attempts, 1);
            }
            other => unreachable!("Expected GenerationStalled, got {other:?}"),
        }
        Ok(())
    }

    // Tests rejections are counted when collisions occur
    // Verified by not incrementing the rejection counter
    #[test]
    fn test_rejections_counted() -> layerforge::Result<()> {
        let schema = three_by_three()?;
        let mut generator = CombinationGenerator::new(&schema, StdRng::seed_from_u64(8));

        generator.generate(27)?;

        assert!(generator.stats.rejections > 0);
        assert_eq!(generator.stats.draws, 27 + generator.stats.rejections);
        Ok(())
    }

    // Tests the uniqueness check spots repeated assignments
    // Verified by comparing identifiers instead of assignments
    #[test]
    fn test_all_unique_detects_repeats() {
        let a = Record::new("1.png", ["Red", "Open"].into_iter().collect());
        let b = Record::new("2.png", ["Red", "Open"].into_iter().collect());
        let c = Record::new("3.png", ["Blue", "Open"].into_iter().collect());

        assert!(all_unique(&[a.clone(), c.clone()]));
        assert!(!all_unique(&[a, c, b]));
        assert!(all_unique(&[]));
    }
}
