use crate::{CascadeError, Field};

/// Live, externally mutable chain of dependent choice widgets.
///
/// Selecting an option may repopulate every field after the selected one.
/// That refresh belongs to the implementation, enumerator only waits for it
/// with [`Cascade::settle`] before reading fields again.
pub trait Cascade {
    /// Snapshot of all fields in cascade order.
    fn fields(&self) -> Result<Vec<Field>, CascadeError>;

    /// Selects option by its position and triggers refresh of dependent fields.
    /// Option values are not unique, a select may repeat the same value.
    fn select(&mut self, field: &str, option: usize) -> Result<(), CascadeError>;

    /// Blocks until all dependent fields have finished repopulating.
    fn settle(&mut self) -> Result<(), CascadeError>;
}
