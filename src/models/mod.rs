pub mod achievement;
pub mod activity;
pub mod field;
pub mod teacher;
pub mod user;

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::achievement::{Achievement, AchievementStats, CategoryCount};
use crate::models::activity::Activity;
use crate::models::field::Field;
use crate::models::teacher::Teacher;
use crate::models::user::{AuthResponse, RegisterResponse, User};

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

/// Success envelope shared by every endpoint. The aliases name each concrete
/// envelope in the OpenAPI document.
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    AchievementEnvelope = ApiResponse<Achievement>,
    AchievementPageEnvelope = ApiResponse<AchievementPage>,
    AchievementStatsEnvelope = ApiResponse<AchievementStats>,
    ActivityEnvelope = ApiResponse<Activity>,
    ActivityPageEnvelope = ApiResponse<ActivityPage>,
    TeacherEnvelope = ApiResponse<Teacher>,
    TeacherListEnvelope = ApiResponse<Vec<Teacher>>,
    UserEnvelope = ApiResponse<User>,
    UserListEnvelope = ApiResponse<Vec<User>>,
    UserPageEnvelope = ApiResponse<UserPage>,
    RegisterEnvelope = ApiResponse<RegisterResponse>,
    AuthEnvelope = ApiResponse<AuthResponse>,
    DashboardEnvelope = ApiResponse<DashboardReport>,
    SystemStatsEnvelope = ApiResponse<SystemStats>
)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Clamps user supplied paging to sane bounds: page >= 1, 1 <= limit <= 100.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Saturates instead of overflowing; a page past the end is simply empty.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Pagination {
    pub current: i64,
    pub pages: i64,
    pub total: i64,
}

impl Pagination {
    pub fn new(request: PageRequest, total: i64) -> Self {
        let pages = (total + request.limit - 1) / request.limit;
        Self {
            current: request.page,
            pages,
            total,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[aliases(AchievementPage = Page<Achievement>, ActivityPage = Page<Activity>, UserPage = Page<User>)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldCount {
    pub field: Field,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardOverview {
    pub total_students: i64,
    pub total_activities: i64,
    pub total_achievements: i64,
    pub pending_approvals: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardReport {
    pub overview: DashboardOverview,
    pub field_stats: Vec<FieldCount>,
    pub category_stats: Vec<CategoryCount>,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema, sqlx::FromRow)]
pub struct SystemStats {
    pub total_users: i64,
    pub total_students: i64,
    pub total_admins: i64,
    pub pending_admins: i64,
    pub active_users: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_clamps() {
        let req = PageRequest::new(Some(0), Some(1000));
        assert_eq!(req, PageRequest { page: 1, limit: 100 });
        assert_eq!(PageRequest::new(None, None).offset(), 0);
        assert_eq!(PageRequest::new(Some(3), Some(5)).offset(), 10);
    }

    #[test]
    fn huge_page_offset_saturates() {
        let req = PageRequest::new(Some(i64::MAX), Some(100));
        assert_eq!(req.offset(), i64::MAX);
    }

    #[test]
    fn pagination_rounds_up() {
        let req = PageRequest::new(Some(1), Some(10));
        assert_eq!(Pagination::new(req, 0).pages, 0);
        assert_eq!(Pagination::new(req, 10).pages, 1);
        assert_eq!(Pagination::new(req, 11).pages, 2);
    }
}
