pub mod group_roster;
pub mod set_group_state;
pub mod suspend_memberships;

/// Per-id result of a bulk mutation. Rows are updated independently; an
/// unknown id is reported instead of being silently skipped so operator
/// mistakes stay visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkOutcome {
    Updated,
    NotFound,
}

#[derive(Debug)]
pub struct BulkReport<I> {
    pub results: Vec<(I, BulkOutcome)>,
}

impl<I> BulkReport<I> {
    pub fn affected(&self) -> usize {
        self.results
            .iter()
            .filter(|(_, outcome)| *outcome == BulkOutcome::Updated)
            .count()
    }
}
