use std::fmt;

use uuid::Uuid;

use super::actor::Actor;
use crate::errors::{AppError, AppResult};
use crate::models::field::Field;
use crate::models::user::{Role, User};

/// Everything a handler can ask the policy about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ListAchievements,
    CreateAchievement,
    ReviewAchievement,
    ViewAchievementStats,
    ListActivities,
    ManageActivities,
    ListFieldTeachers,
    ListTeachers,
    ManageTeachers,
    ListStudents,
    ViewDashboard,
    /// Admin approval/rejection, activation toggling, full user listing, system stats.
    ManageAccounts,
}

impl Action {
    fn describe(&self) -> &'static str {
        match self {
            Action::ListAchievements => "list achievements",
            Action::CreateAchievement => "create achievements",
            Action::ReviewAchievement => "review achievements",
            Action::ViewAchievementStats => "view achievement statistics",
            Action::ListActivities => "list activities",
            Action::ManageActivities => "manage activities",
            Action::ListFieldTeachers => "list teachers by field",
            Action::ListTeachers => "list teachers",
            Action::ManageTeachers => "manage teachers",
            Action::ListStudents => "list students",
            Action::ViewDashboard => "view the dashboard",
            Action::ManageAccounts => "manage accounts",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Role table. The only place that decides which role may do what.
pub fn permits(role: Role, action: Action) -> bool {
    use Action::*;

    match action {
        ListAchievements | CreateAchievement | ViewAchievementStats | ListActivities | ListTeachers => true,
        ReviewAchievement | ManageActivities | ListFieldTeachers | ManageTeachers | ListStudents | ViewDashboard => {
            matches!(role, Role::Admin | Role::SuperAdmin)
        }
        ManageAccounts => matches!(role, Role::SuperAdmin),
    }
}

pub fn authorize(actor: &Actor, action: Action) -> AppResult<()> {
    if permits(actor.role, action) {
        tracing::debug!(user_id = %actor.user_id, role = %actor.role, action = %action, "authorized");
        return Ok(());
    }

    tracing::debug!(user_id = %actor.user_id, role = %actor.role, action = %action, "permission denied");
    Err(AppError::forbidden(format!("{} accounts may not {}", actor.role, action)))
}

/// Which achievements an actor may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementScope {
    /// Only records whose student is this user.
    Own(Uuid),
    /// Only records whose student's department equals the field.
    Department(Field),
    Unrestricted,
}

impl AchievementScope {
    /// `student_department` is `None` when the student cannot be resolved;
    /// such records are never visible to a department-scoped admin.
    pub fn admits(&self, student_id: Uuid, student_department: Option<Field>) -> bool {
        match self {
            AchievementScope::Own(user_id) => *user_id == student_id,
            AchievementScope::Department(field) => student_department == Some(*field),
            AchievementScope::Unrestricted => true,
        }
    }
}

pub fn achievement_scope(actor: &Actor) -> AppResult<AchievementScope> {
    match actor.role {
        Role::Student => Ok(AchievementScope::Own(actor.user_id)),
        Role::Admin => Ok(AchievementScope::Department(admin_field(actor)?)),
        Role::SuperAdmin => Ok(AchievementScope::Unrestricted),
    }
}

/// Which students (and their derived counts) an actor may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentScope {
    Department(Field),
    Unrestricted,
}

impl StudentScope {
    pub fn admits(&self, department: Option<Field>) -> bool {
        match self {
            StudentScope::Department(field) => department == Some(*field),
            StudentScope::Unrestricted => true,
        }
    }

    pub fn field(&self) -> Option<Field> {
        match self {
            StudentScope::Department(field) => Some(*field),
            StudentScope::Unrestricted => None,
        }
    }
}

pub fn student_scope(actor: &Actor) -> AppResult<StudentScope> {
    match actor.role {
        Role::Student => Err(AppError::forbidden("students may not list other students")),
        Role::Admin => Ok(StudentScope::Department(admin_field(actor)?)),
        Role::SuperAdmin => Ok(StudentScope::Unrestricted),
    }
}

fn admin_field(actor: &Actor) -> AppResult<Field> {
    actor
        .field
        .ok_or_else(|| AppError::forbidden("admin account has no field assigned"))
}

/// Resolves whose achievement is being created. Students always create their own.
pub fn creation_target(actor: &Actor, requested: Option<Uuid>) -> AppResult<Uuid> {
    match actor.role {
        Role::Student => Ok(actor.user_id),
        Role::Admin | Role::SuperAdmin => {
            requested.ok_or_else(|| AppError::bad_request("student is required when creating on a student's behalf"))
        }
    }
}

/// Points and highlighting are curated by reviewers, never by students.
pub fn may_curate(actor: &Actor) -> bool {
    matches!(actor.role, Role::Admin | Role::SuperAdmin)
}

/// An activity's teacher must belong to the activity's field unless the field is `General`.
pub fn ensure_teacher_assignment(activity_field: Field, teacher_field: Field) -> AppResult<()> {
    if activity_field.is_general() || activity_field == teacher_field {
        return Ok(());
    }

    Err(AppError::bad_request(format!(
        "Teacher's field ({}) does not match activity field ({})",
        teacher_field, activity_field
    )))
}

/// Admins stay locked out until a superadmin approves them.
pub fn ensure_approved(user: &User) -> AppResult<()> {
    if user.role == Role::Admin && !user.is_approved {
        return Err(AppError::PendingApproval);
    }
    Ok(())
}

pub fn ensure_active(user: &User) -> AppResult<()> {
    if !user.is_active {
        return Err(AppError::Deactivated);
    }
    Ok(())
}

/// Gate applied to every authenticated request on the freshly loaded user.
pub fn admit(user: &User) -> AppResult<()> {
    ensure_approved(user)?;
    ensure_active(user)
}
