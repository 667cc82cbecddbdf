/// Duplicate-combination detection over generated records
pub mod duplicates;
/// Unique weighted combination generation
pub mod generator;
/// Weighted categorical selection over trait variants
pub mod sampling;
