use crate::errors::{AppError, AppResult};
use crate::models::user::{Role, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountDecision {
    Approve,
    Reject,
}

/// What the identity store must do with the account.
///
/// Rejection removes the record instead of marking it, unlike achievement rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountTransition {
    MarkApproved,
    Remove,
}

/// unapproved admin -> approved | removed.
pub fn decide(target: &User, decision: AccountDecision) -> AppResult<AccountTransition> {
    if target.role != Role::Admin {
        return Err(AppError::bad_request(format!(
            "only admin accounts require approval, this account is a {}",
            target.role
        )));
    }

    if target.is_approved {
        return Err(AppError::conflict("admin account is already approved"));
    }

    Ok(match decision {
        AccountDecision::Approve => AccountTransition::MarkApproved,
        AccountDecision::Reject => AccountTransition::Remove,
    })
}

/// Returns the new `is_active` value. Independent of approval state.
pub fn toggle_active(target: &User) -> AppResult<bool> {
    if target.role == Role::SuperAdmin {
        return Err(AppError::bad_request("superadmin accounts cannot be deactivated"));
    }

    Ok(!target.is_active)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn account(role: Role, is_approved: bool, is_active: bool) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Pending Admin".into(),
            email: "pending@example.com".into(),
            role,
            is_approved,
            is_active,
            department: None,
            year: None,
            skills: Vec::new(),
            interests: Vec::new(),
            field: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn pending_admin_can_be_approved_or_removed() {
        let admin = account(Role::Admin, false, true);
        assert_eq!(decide(&admin, AccountDecision::Approve).unwrap(), AccountTransition::MarkApproved);
        assert_eq!(decide(&admin, AccountDecision::Reject).unwrap(), AccountTransition::Remove);
    }

    #[test]
    fn approved_admin_is_terminal() {
        let admin = account(Role::Admin, true, true);
        assert!(matches!(decide(&admin, AccountDecision::Approve), Err(AppError::Conflict(_))));
        assert!(matches!(decide(&admin, AccountDecision::Reject), Err(AppError::Conflict(_))));
    }

    #[test]
    fn students_do_not_go_through_approval() {
        let student = account(Role::Student, true, true);
        assert!(matches!(decide(&student, AccountDecision::Reject), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn toggle_flips_activity_but_spares_superadmins() {
        assert!(!toggle_active(&account(Role::Admin, true, true)).unwrap());
        assert!(toggle_active(&account(Role::Student, true, false)).unwrap());
        assert!(toggle_active(&account(Role::Admin, false, false)).unwrap());
        assert!(matches!(
            toggle_active(&account(Role::SuperAdmin, true, true)),
            Err(AppError::BadRequest(_))
        ));
    }
}
