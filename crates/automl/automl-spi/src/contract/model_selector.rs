//! Model selection trait for AutoML.

use crate::model::{Candidate, SelectionResult};

/// Chooses the deployable model between two scored candidates.
///
/// Implementations must be pure functions of the candidates' validation
/// scores: the same two scores always select the same slot.
pub trait ModelSelector {
    /// Select between `first` (the incumbent) and `second` (the challenger).
    fn select(&self, first: Candidate, second: Candidate) -> SelectionResult;
}
