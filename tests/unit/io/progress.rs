//! Tests for stage progress tracking

#[cfg(test)]
mod tests {
    use layerforge::io::progress::ProgressManager;

    // Tests a full two-stage lifecycle
    // Verified by not counting finished stages
    #[test]
    fn test_stage_lifecycle() {
        let mut pm = ProgressManager::new();

        pm.start_stage("Combining Images", 3);
        for file in ["1.png", "2.png", "3.png"] {
            pm.advance(file);
        }
        pm.start_stage("Assembling Images", 3);
        pm.advance("1.png");
        pm.finish();

        assert_eq!(pm.completed_stages(), 2);
    }

    // Tests advancing without a stage is harmless
    // Verified by unwrapping the stage bar
    #[test]
    fn test_advance_without_stage() {
        let mut pm = ProgressManager::default();

        pm.advance("1.png");
        pm.finish_stage();
        pm.finish();

        assert_eq!(pm.completed_stages(), 0);
    }

    // Tests empty stages
    // Verified by adding panic for zero steps
    #[test]
    fn test_empty_stage() {
        let mut pm = ProgressManager::new();
        pm.start_stage("Combining Images", 0);
        pm.finish();

        assert_eq!(pm.completed_stages(), 1);
    }
}
