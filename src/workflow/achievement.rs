use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::achievement::AchievementStatus;

pub const MAX_REMARKS_LEN: usize = 200;

/// Field values a review writes onto an achievement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewTransition {
    pub status: AchievementStatus,
    pub remarks: Option<String>,
    pub approved_by: Uuid,
    /// Set on approval, cleared on rejection.
    pub approved_at: Option<DateTime<Utc>>,
}

/// pending -> approved | rejected. Both targets are terminal.
pub fn review(
    current: AchievementStatus,
    target: AchievementStatus,
    remarks: Option<&str>,
    reviewer: Uuid,
    now: DateTime<Utc>,
) -> AppResult<ReviewTransition> {
    if target == AchievementStatus::Pending {
        return Err(AppError::bad_request("status must be approved or rejected"));
    }

    let remarks = normalize_remarks(remarks)?;
    if target == AchievementStatus::Rejected && remarks.is_none() {
        return Err(AppError::bad_request("remarks are required when rejecting an achievement"));
    }

    if current != AchievementStatus::Pending {
        return Err(AppError::conflict(format!("achievement is already {current}")));
    }

    Ok(ReviewTransition {
        status: target,
        remarks,
        approved_by: reviewer,
        approved_at: (target == AchievementStatus::Approved).then_some(now),
    })
}

fn normalize_remarks(remarks: Option<&str>) -> AppResult<Option<String>> {
    let Some(remarks) = remarks.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };

    if remarks.chars().count() > MAX_REMARKS_LEN {
        return Err(AppError::bad_request(format!(
            "remarks cannot exceed {MAX_REMARKS_LEN} characters"
        )));
    }

    Ok(Some(remarks.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approval_stamps_reviewer_and_time() {
        let reviewer = Uuid::new_v4();
        let now = Utc::now();

        let t = review(AchievementStatus::Pending, AchievementStatus::Approved, Some(" Verified "), reviewer, now).unwrap();

        assert_eq!(t.status, AchievementStatus::Approved);
        assert_eq!(t.remarks.as_deref(), Some("Verified"));
        assert_eq!(t.approved_by, reviewer);
        assert_eq!(t.approved_at, Some(now));
    }

    #[test]
    fn approval_without_remarks_is_fine() {
        let t = review(AchievementStatus::Pending, AchievementStatus::Approved, None, Uuid::new_v4(), Utc::now()).unwrap();
        assert!(t.remarks.is_none());
    }

    #[test]
    fn rejection_clears_approved_at() {
        let reviewer = Uuid::new_v4();
        let t = review(
            AchievementStatus::Pending,
            AchievementStatus::Rejected,
            Some("No certificate attached"),
            reviewer,
            Utc::now(),
        )
        .unwrap();

        assert_eq!(t.status, AchievementStatus::Rejected);
        assert_eq!(t.approved_by, reviewer);
        assert!(t.approved_at.is_none());
    }

    #[test]
    fn rejection_requires_remarks() {
        for remarks in [None, Some(""), Some("   ")] {
            let res = review(AchievementStatus::Pending, AchievementStatus::Rejected, remarks, Uuid::new_v4(), Utc::now());
            assert!(matches!(res, Err(AppError::BadRequest(_))));
        }
    }

    #[test]
    fn pending_is_not_a_target() {
        let res = review(AchievementStatus::Pending, AchievementStatus::Pending, None, Uuid::new_v4(), Utc::now());
        assert!(matches!(res, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn terminal_states_do_not_move() {
        for current in [AchievementStatus::Approved, AchievementStatus::Rejected] {
            for target in [AchievementStatus::Approved, AchievementStatus::Rejected] {
                let res = review(current, target, Some("again"), Uuid::new_v4(), Utc::now());
                assert!(matches!(res, Err(AppError::Conflict(_))), "{current} -> {target}");
            }
        }
    }

    #[test]
    fn remarks_are_capped() {
        let long = "x".repeat(MAX_REMARKS_LEN + 1);
        let res = review(AchievementStatus::Pending, AchievementStatus::Approved, Some(&long), Uuid::new_v4(), Utc::now());
        assert!(matches!(res, Err(AppError::BadRequest(_))));

        let exact = "x".repeat(MAX_REMARKS_LEN);
        assert!(review(AchievementStatus::Pending, AchievementStatus::Approved, Some(&exact), Uuid::new_v4(), Utc::now()).is_ok());
    }
}
