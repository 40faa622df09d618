use crate::error::app_error::AppError;
use crate::models::booking::{Booking, BookingPatchRequest, BookingStatus, TransitionPlan};
use crate::models::user::{Actor, Role};

/// The one thing a PATCH body is allowed to ask for.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingAction {
    Pay,
    Accept,
    Reject { reason: String },
    Complete,
    Rate { rating: i32, comment: Option<String> },
}

impl BookingAction {
    fn verb(&self) -> &'static str {
        match self {
            BookingAction::Pay => "pay for",
            BookingAction::Accept => "accept",
            BookingAction::Reject { .. } => "reject",
            BookingAction::Complete => "complete",
            BookingAction::Rate { .. } => "rate",
        }
    }
}

/// Interpret a PATCH body as exactly one action.
///
/// A present `status` wins; otherwise a present `rating` is a rating
/// submission. Ratings must be integers in 1..=5 — zero or out-of-range
/// values are rejected rather than defaulted.
pub fn action_from_patch(patch: &BookingPatchRequest) -> Result<BookingAction, AppError> {
    if let Some(status) = patch.status {
        return match status {
            BookingStatus::Paid => Ok(BookingAction::Pay),
            BookingStatus::Accepted => Ok(BookingAction::Accept),
            BookingStatus::Rejected => {
                let reason = patch.reject_reason.as_deref().map(str::trim).unwrap_or("");
                if reason.is_empty() {
                    Err(AppError::BadRequest("A rejection reason is required".to_string()))
                } else {
                    Ok(BookingAction::Reject {
                        reason: reason.to_string(),
                    })
                }
            }
            BookingStatus::Completed => Ok(BookingAction::Complete),
            BookingStatus::Pending => Err(AppError::Conflict("A booking cannot be moved back to pending".to_string())),
        };
    }

    match patch.rating {
        Some(rating) if (1..=5).contains(&rating) => Ok(BookingAction::Rate {
            rating,
            comment: patch.comment.as_deref().map(str::trim).filter(|c| !c.is_empty()).map(str::to_string),
        }),
        Some(rating) => Err(AppError::BadRequest(format!("Rating must be between 1 and 5, got {rating}"))),
        None => Err(AppError::BadRequest("Patch must set a status or a rating".to_string())),
    }
}

fn authorize(booking: &Booking, actor: &Actor, action: &BookingAction) -> Result<(), AppError> {
    let (owner_id, required_role) = match action {
        BookingAction::Pay | BookingAction::Rate { .. } => (booking.customer_id, Role::Customer),
        BookingAction::Accept | BookingAction::Reject { .. } | BookingAction::Complete => (booking.provider_id, Role::Provider),
    };

    if actor.role != required_role || actor.id != owner_id {
        return Err(AppError::Forbidden(format!(
            "Only the booking's {} may {} it",
            match required_role {
                Role::Customer => "customer",
                Role::Provider => "provider",
            },
            action.verb()
        )));
    }

    Ok(())
}

/// Validate an action against the transition table and produce the
/// conditional write the repository must perform.
///
/// Valid transitions: pending→paid (customer), paid→accepted (provider),
/// paid→rejected (provider, with reason), accepted→completed (provider),
/// plus a one-time rating attach on completed (customer). Everything else
/// is a conflict.
pub fn plan_transition(booking: &Booking, actor: &Actor, action: BookingAction) -> Result<TransitionPlan, AppError> {
    authorize(booking, actor, &action)?;

    use BookingStatus::*;
    match (booking.status, action) {
        (Pending, BookingAction::Pay) => Ok(TransitionPlan::Status {
            expected: Pending,
            next: Paid,
            reject_reason: None,
        }),
        (Paid, BookingAction::Accept) => Ok(TransitionPlan::Status {
            expected: Paid,
            next: Accepted,
            reject_reason: None,
        }),
        (Paid, BookingAction::Reject { reason }) => Ok(TransitionPlan::Status {
            expected: Paid,
            next: Rejected,
            reject_reason: Some(reason),
        }),
        (Accepted, BookingAction::Complete) => Ok(TransitionPlan::Status {
            expected: Accepted,
            next: Completed,
            reject_reason: None,
        }),
        (Completed, BookingAction::Rate { rating, comment }) => {
            if booking.rating.is_some() {
                Err(AppError::Conflict("This booking has already been rated".to_string()))
            } else {
                Ok(TransitionPlan::Rating { rating, comment })
            }
        }
        (from, action) => Err(AppError::Conflict(format!("Cannot {} a {} booking", action.verb(), from))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sample_booking, sample_customer};

    fn customer_actor(booking: &Booking) -> Actor {
        Actor {
            id: booking.customer_id,
            role: Role::Customer,
        }
    }

    fn provider_actor(booking: &Booking) -> Actor {
        Actor {
            id: booking.provider_id,
            role: Role::Provider,
        }
    }

    fn patch(status: Option<BookingStatus>) -> BookingPatchRequest {
        BookingPatchRequest {
            status,
            reject_reason: None,
            rating: None,
            comment: None,
        }
    }

    #[test]
    fn customer_pays_pending_booking() {
        let booking = sample_booking();
        let plan = plan_transition(&booking, &customer_actor(&booking), BookingAction::Pay).unwrap();
        assert_eq!(
            plan,
            TransitionPlan::Status {
                expected: BookingStatus::Pending,
                next: BookingStatus::Paid,
                reject_reason: None,
            }
        );
    }

    #[test]
    fn provider_accepts_paid_booking() {
        let mut booking = sample_booking();
        booking.status = BookingStatus::Paid;
        let plan = plan_transition(&booking, &provider_actor(&booking), BookingAction::Accept).unwrap();
        assert!(matches!(plan, TransitionPlan::Status { next: BookingStatus::Accepted, .. }));
    }

    #[test]
    fn provider_rejects_paid_booking_with_reason() {
        let mut booking = sample_booking();
        booking.status = BookingStatus::Paid;
        let action = BookingAction::Reject {
            reason: "schedule conflict".to_string(),
        };
        let plan = plan_transition(&booking, &provider_actor(&booking), action).unwrap();
        assert_eq!(
            plan,
            TransitionPlan::Status {
                expected: BookingStatus::Paid,
                next: BookingStatus::Rejected,
                reject_reason: Some("schedule conflict".to_string()),
            }
        );
    }

    #[test]
    fn provider_completes_accepted_booking() {
        let mut booking = sample_booking();
        booking.status = BookingStatus::Accepted;
        let plan = plan_transition(&booking, &provider_actor(&booking), BookingAction::Complete).unwrap();
        assert!(matches!(plan, TransitionPlan::Status { next: BookingStatus::Completed, .. }));
    }

    #[test]
    fn accepting_an_unpaid_booking_is_a_conflict() {
        let booking = sample_booking();
        let err = plan_transition(&booking, &provider_actor(&booking), BookingAction::Accept).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn completing_a_paid_booking_is_a_conflict() {
        let mut booking = sample_booking();
        booking.status = BookingStatus::Paid;
        let err = plan_transition(&booking, &provider_actor(&booking), BookingAction::Complete).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn paying_twice_is_a_conflict() {
        let mut booking = sample_booking();
        booking.status = BookingStatus::Paid;
        let err = plan_transition(&booking, &customer_actor(&booking), BookingAction::Pay).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn rejected_is_terminal() {
        let mut booking = sample_booking();
        booking.status = BookingStatus::Rejected;
        for action in [BookingAction::Accept, BookingAction::Complete] {
            let err = plan_transition(&booking, &provider_actor(&booking), action).unwrap_err();
            assert!(matches!(err, AppError::Conflict(_)));
        }
    }

    #[test]
    fn wrong_customer_cannot_pay() {
        let booking = sample_booking();
        let stranger = Actor {
            id: sample_customer().id,
            role: Role::Customer,
        };
        let err = plan_transition(&booking, &stranger, BookingAction::Pay).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn customer_cannot_accept_their_own_booking() {
        let mut booking = sample_booking();
        booking.status = BookingStatus::Paid;
        let err = plan_transition(&booking, &customer_actor(&booking), BookingAction::Accept).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn provider_cannot_rate() {
        let mut booking = sample_booking();
        booking.status = BookingStatus::Completed;
        let action = BookingAction::Rate { rating: 5, comment: None };
        let err = plan_transition(&booking, &provider_actor(&booking), action).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn rating_a_completed_booking_once_succeeds() {
        let mut booking = sample_booking();
        booking.status = BookingStatus::Completed;
        let action = BookingAction::Rate {
            rating: 4,
            comment: Some("spotless".to_string()),
        };
        let plan = plan_transition(&booking, &customer_actor(&booking), action).unwrap();
        assert_eq!(
            plan,
            TransitionPlan::Rating {
                rating: 4,
                comment: Some("spotless".to_string()),
            }
        );
    }

    #[test]
    fn rating_twice_is_a_conflict() {
        let mut booking = sample_booking();
        booking.status = BookingStatus::Completed;
        booking.rating = Some(5);
        let action = BookingAction::Rate { rating: 1, comment: None };
        let err = plan_transition(&booking, &customer_actor(&booking), action).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(booking.rating, Some(5));
    }

    #[test]
    fn rating_before_completion_is_a_conflict() {
        let mut booking = sample_booking();
        booking.status = BookingStatus::Accepted;
        let action = BookingAction::Rate { rating: 3, comment: None };
        let err = plan_transition(&booking, &customer_actor(&booking), action).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn patch_without_status_or_rating_is_invalid() {
        let err = action_from_patch(&patch(None)).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn patch_rejection_requires_a_reason() {
        let mut body = patch(Some(BookingStatus::Rejected));
        let err = action_from_patch(&body).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        body.reject_reason = Some("   ".to_string());
        let err = action_from_patch(&body).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        body.reject_reason = Some("schedule conflict".to_string());
        let action = action_from_patch(&body).unwrap();
        assert_eq!(
            action,
            BookingAction::Reject {
                reason: "schedule conflict".to_string(),
            }
        );
    }

    #[test]
    fn patch_zero_rating_is_invalid() {
        let mut body = patch(None);
        body.rating = Some(0);
        let err = action_from_patch(&body).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        body.rating = Some(6);
        assert!(action_from_patch(&body).is_err());
    }

    #[test]
    fn patch_back_to_pending_is_a_conflict() {
        let err = action_from_patch(&patch(Some(BookingStatus::Pending))).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn patch_blank_comment_is_dropped() {
        let mut body = patch(None);
        body.rating = Some(5);
        body.comment = Some("  ".to_string());
        let action = action_from_patch(&body).unwrap();
        assert_eq!(action, BookingAction::Rate { rating: 5, comment: None });
    }
}
