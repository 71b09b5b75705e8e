//! Pure edits over a tracker collection. Order is insertion order and is
//! never changed here.

use rolodex_core::{OpportunityPatch, TrackedOpportunity};

/// Appends `seed_row` unless a row with its id is already present.
pub fn ensure_seed_row(
    mut collection: Vec<TrackedOpportunity>,
    seed_row: &TrackedOpportunity,
) -> Vec<TrackedOpportunity> {
    if !collection.iter().any(|row| row.id == seed_row.id) {
        collection.push(seed_row.clone());
    }
    collection
}

/// Returns a copy of `collection` with `patch` merged into the row whose id
/// matches. An unknown id yields an unchanged copy.
pub fn update(
    collection: &[TrackedOpportunity],
    id: &str,
    patch: &OpportunityPatch,
) -> Vec<TrackedOpportunity> {
    collection
        .iter()
        .map(|row| {
            let mut row = row.clone();
            if row.id == id {
                row.apply(patch);
            }
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolodex_core::TrackingStatus;

    fn row(id: &str, status: TrackingStatus) -> TrackedOpportunity {
        TrackedOpportunity {
            id: id.to_string(),
            name: format!("Org {id}"),
            label: "Analyst".to_string(),
            location: None,
            created_on: "2025-08-01".to_string(),
            status,
            flagged: false,
            deadline: "2025-08-22".to_string(),
            next_step_on: None,
        }
    }

    #[test]
    fn ensure_seed_row_appends_once() {
        let seed = row("jpm-er-sa", TrackingStatus::NotApplied);
        let collection = vec![row("a", TrackingStatus::Phone)];
        let once = ensure_seed_row(collection, &seed);
        let twice = ensure_seed_row(once.clone(), &seed);
        assert_eq!(once, twice);
        assert_eq!(
            twice.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            vec!["a", "jpm-er-sa"]
        );
    }

    #[test]
    fn ensure_seed_row_keeps_existing_version() {
        let existing = row("jpm-er-sa", TrackingStatus::Offer);
        let seed = row("jpm-er-sa", TrackingStatus::NotApplied);
        let result = ensure_seed_row(vec![existing.clone()], &seed);
        assert_eq!(result, vec![existing]);
    }

    #[test]
    fn update_touches_only_matching_row() {
        let collection = vec![
            row("a", TrackingStatus::NotApplied),
            row("b", TrackingStatus::Phone),
        ];
        let updated = update(
            &collection,
            "b",
            &OpportunityPatch::status(TrackingStatus::Offer),
        );
        assert_eq!(updated.len(), collection.len());
        assert_eq!(updated[0], collection[0]);
        assert_eq!(updated[1].status, TrackingStatus::Offer);
        assert_eq!(collection[1].status, TrackingStatus::Phone);
    }

    #[test]
    fn update_allows_moving_backwards() {
        let collection = vec![row("a", TrackingStatus::Offer)];
        let updated = update(
            &collection,
            "a",
            &OpportunityPatch::status(TrackingStatus::NotApplied),
        );
        assert_eq!(updated[0].status, TrackingStatus::NotApplied);
    }

    #[test]
    fn update_with_unknown_id_is_a_no_op() {
        let collection = vec![row("a", TrackingStatus::NotApplied)];
        let updated = update(
            &collection,
            "nonexistent",
            &OpportunityPatch::status(TrackingStatus::Phone),
        );
        assert_eq!(updated, collection);
    }
}
