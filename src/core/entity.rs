//! Entity trait - common interface for catalog entities with a stable id and title

/// Common trait for catalog entities that appear as matrix rows or columns
pub trait Entity {
    /// Get the entity's stable identifier
    fn id(&self) -> &str;

    /// Get the entity's display title
    fn title(&self) -> &str;
}
