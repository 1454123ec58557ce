//! Status transition rules.
//!
//! This table is the single source of truth for the photo lifecycle. Every
//! status change — single-item, bulk, or worker-driven — must pass through
//! [`validate_transition`]; no other code path mutates a photo's status.

use photoflow_core::{DomainError, DomainResult};

use crate::photo::PhotoStatus;

/// Statuses reachable from `status` (excluding the no-op self-transition).
pub fn allowed_transitions(status: PhotoStatus) -> &'static [PhotoStatus] {
    match status {
        PhotoStatus::Uploaded => &[PhotoStatus::Processing, PhotoStatus::Failed],
        PhotoStatus::Processing => &[PhotoStatus::Completed, PhotoStatus::Failed],
        PhotoStatus::Completed => &[PhotoStatus::Reviewed],
        // Terminal state.
        PhotoStatus::Reviewed => &[],
        // Allow retry.
        PhotoStatus::Failed => &[PhotoStatus::Uploaded],
    }
}

/// Validate a proposed transition.
///
/// A self-transition (`current == proposed`) is always permitted as a no-op.
pub fn validate_transition(current: PhotoStatus, proposed: PhotoStatus) -> DomainResult<()> {
    if current == proposed {
        return Ok(());
    }

    if allowed_transitions(current).contains(&proposed) {
        Ok(())
    } else {
        Err(DomainError::invalid_transition(
            current.to_string(),
            proposed.to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALL: [PhotoStatus; 5] = [
        PhotoStatus::Uploaded,
        PhotoStatus::Processing,
        PhotoStatus::Completed,
        PhotoStatus::Reviewed,
        PhotoStatus::Failed,
    ];

    #[test]
    fn happy_path_transitions_are_allowed() {
        assert!(validate_transition(PhotoStatus::Uploaded, PhotoStatus::Processing).is_ok());
        assert!(validate_transition(PhotoStatus::Processing, PhotoStatus::Completed).is_ok());
        assert!(validate_transition(PhotoStatus::Completed, PhotoStatus::Reviewed).is_ok());
    }

    #[test]
    fn failure_and_retry_are_allowed() {
        assert!(validate_transition(PhotoStatus::Uploaded, PhotoStatus::Failed).is_ok());
        assert!(validate_transition(PhotoStatus::Processing, PhotoStatus::Failed).is_ok());
        assert!(validate_transition(PhotoStatus::Failed, PhotoStatus::Uploaded).is_ok());
    }

    #[test]
    fn skipping_processing_is_rejected() {
        let err = validate_transition(PhotoStatus::Uploaded, PhotoStatus::Completed).unwrap_err();
        assert_eq!(
            err,
            photoflow_core::DomainError::invalid_transition("UPLOADED", "COMPLETED")
        );
    }

    #[test]
    fn reviewed_is_terminal() {
        for to in ALL {
            if to == PhotoStatus::Reviewed {
                continue;
            }
            assert!(validate_transition(PhotoStatus::Reviewed, to).is_err());
        }
    }

    #[test]
    fn exhaustive_pairs_match_the_table() {
        for from in ALL {
            for to in ALL {
                let expected = from == to || allowed_transitions(from).contains(&to);
                assert_eq!(
                    validate_transition(from, to).is_ok(),
                    expected,
                    "{from} -> {to}"
                );
            }
        }
    }

    proptest! {
        #[test]
        fn self_transition_is_always_a_no_op(status in proptest::sample::select(ALL.to_vec())) {
            prop_assert!(validate_transition(status, status).is_ok());
        }

        #[test]
        fn rejection_names_both_states(
            from in proptest::sample::select(ALL.to_vec()),
            to in proptest::sample::select(ALL.to_vec()),
        ) {
            if let Err(err) = validate_transition(from, to) {
                let msg = err.to_string();
                prop_assert!(msg.contains(&from.to_string()));
                prop_assert!(msg.contains(&to.to_string()));
            }
        }
    }
}
