//! Choosing the deployable model.

use automl_spi::{Candidate, ModelSelector, SelectedSlot, SelectionResult, TieBreakPolicy};

/// Selects the candidate with the lower validation RMSE.
///
/// The second candidate replaces the first only when its RMSE is strictly
/// lower ([`TieBreakPolicy::KeepFirstOnTie`]). Equal scores, and any
/// comparison involving NaN, keep the first.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowestRmseSelector {
    policy: TieBreakPolicy,
}

impl LowestRmseSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn policy(&self) -> TieBreakPolicy {
        self.policy
    }
}

impl ModelSelector for LowestRmseSelector {
    fn select(&self, first: Candidate, second: Candidate) -> SelectionResult {
        let first_rmse = first.rmse;
        let second_rmse = second.rmse;

        let (winner, slot) = match self.policy {
            TieBreakPolicy::KeepFirstOnTie if second_rmse < first_rmse => {
                (second, SelectedSlot::Second)
            }
            TieBreakPolicy::KeepFirstOnTie => (first, SelectedSlot::First),
        };

        tracing::info!(
            first = %first_rmse,
            second = %second_rmse,
            selected = %winner.family(),
            "model selected"
        );

        SelectionResult {
            family: winner.family(),
            rmse: winner.rmse,
            model: winner.model,
            first_rmse,
            second_rmse,
            winner: slot,
            policy: self.policy,
        }
    }
}
