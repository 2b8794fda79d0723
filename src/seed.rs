//! Operator tasks run from the CLI: bootstrapping the superadmin and loading demo data.

use chrono::{TimeZone, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::achievement::{AchievementStatus, Position};
use crate::models::activity::{Activity, Category};
use crate::models::field::Field;
use crate::models::teacher::Teacher;
use crate::models::user::{Role, User};
use crate::store::achievements::{self, NewAchievement};
use crate::store::catalog;
use crate::store::users::{self, NewUser};
use crate::utils::{hash_password, utc_now};
use crate::validation;
use crate::workflow;

pub const DEMO_PASSWORD: &str = "Password123!";
pub const DEMO_SUPERADMIN_PASSWORD: &str = "SuperAdmin123!";

/// Creates the single superadmin. Refuses when one already exists.
pub async fn create_superadmin(pool: &SqlitePool, name: &str, email: &str, password: &str) -> AppResult<User> {
    if let Some(existing) = users::find_superadmin(pool).await? {
        return Err(AppError::conflict(format!("a superadmin already exists: {}", existing.email)));
    }

    let email = validation::email(email)?;
    if users::email_taken(pool, &email).await? {
        return Err(AppError::conflict("email already in use"));
    }

    users::insert(
        pool,
        NewUser {
            name: validation::person_name(name)?,
            email,
            password_hash: hash_password(password)?,
            role: Role::SuperAdmin,
            is_approved: true,
            department: None,
            year: None,
            field: None,
        },
    )
    .await
}

#[derive(Debug, Default)]
pub struct SeedSummary {
    pub users: usize,
    pub teachers: usize,
    pub activities: usize,
    pub achievements: usize,
}

/// Wipes every table and loads a small demo data set. Every seeded account
/// uses [`DEMO_PASSWORD`] except the superadmin.
pub async fn seed_demo(pool: &SqlitePool) -> AppResult<SeedSummary> {
    clear(pool).await?;
    let mut summary = SeedSummary::default();

    let superadmin = create_superadmin(pool, "System Administrator", "superadmin@example.com", DEMO_SUPERADMIN_PASSWORD)
        .await?;
    let password_hash = hash_password(DEMO_PASSWORD)?;

    let admin = users::insert(
        pool,
        NewUser {
            name: "Admin User".into(),
            email: "admin@example.com".into(),
            password_hash: password_hash.clone(),
            role: Role::Admin,
            is_approved: true,
            department: None,
            year: None,
            field: Some(Field::ComputerScience),
        },
    )
    .await?;
    summary.users += 2;

    let students = [
        (
            "John Doe",
            "john.doe@student.edu",
            Field::ComputerScience,
            2,
            &["JavaScript", "Python", "React"][..],
            &["Web Development", "AI/ML"][..],
        ),
        (
            "Jane Smith",
            "jane.smith@student.edu",
            Field::Mechanical,
            3,
            &["CAD", "MATLAB", "3D Printing"][..],
            &["Robotics", "Automotive"][..],
        ),
        (
            "Alice Johnson",
            "alice.johnson@student.edu",
            Field::Electrical,
            1,
            &["Circuit Design", "Arduino"][..],
            &["IoT", "Embedded Systems"][..],
        ),
    ];

    let mut student_ids = Vec::with_capacity(students.len());
    for (name, email, department, year, skills, interests) in students {
        let mut student = users::insert(
            pool,
            NewUser {
                name: name.into(),
                email: email.into(),
                password_hash: password_hash.clone(),
                role: Role::Student,
                is_approved: true,
                department: Some(department),
                year: Some(year),
                field: None,
            },
        )
        .await?;
        student.skills = skills.iter().map(|s| s.to_string()).collect();
        student.interests = interests.iter().map(|s| s.to_string()).collect();
        users::save_profile(pool, &student).await?;

        student_ids.push(student.id);
        summary.users += 1;
    }

    let now = utc_now();
    let teachers = [
        ("Dr. Robert Wilson", "robert.wilson@university.edu", Field::ComputerScience, "1234567890", "Professor"),
        ("Dr. Sarah Davis", "sarah.davis@university.edu", Field::Mechanical, "1234567891", "Associate Professor"),
        ("Dr. Michael Brown", "michael.brown@university.edu", Field::Electrical, "1234567892", "Assistant Professor"),
    ];

    let mut teacher_ids = Vec::with_capacity(teachers.len());
    for (name, email, field, phone, designation) in teachers {
        let teacher = Teacher {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            field,
            department: field,
            phone: Some(phone.into()),
            designation: designation.into(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        catalog::insert_teacher(pool, &teacher).await?;
        teacher_ids.push(teacher.id);
        summary.teachers += 1;
    }

    let activities = [
        (
            "Annual Programming Contest",
            "Competitive programming contest for all computer science students",
            Field::ComputerScience,
            "Computer Lab A",
            50,
            15,
            &["programming", "contest", "coding"][..],
        ),
        (
            "Robotics Workshop",
            "Hands-on workshop on building and programming robots",
            Field::Mechanical,
            "Mechanical Workshop",
            30,
            20,
            &["robotics", "workshop", "hands-on"][..],
        ),
        (
            "Circuit Design Competition",
            "Design innovative circuits for real-world applications",
            Field::Electrical,
            "Electronics Lab",
            25,
            25,
            &["circuits", "design", "electronics"][..],
        ),
    ];

    let mut activity_ids = Vec::with_capacity(activities.len());
    for ((title, description, field, venue, max_participants, day, tags), teacher_id) in
        activities.into_iter().zip(teacher_ids.iter().copied())
    {
        let event_date = Utc
            .with_ymd_and_hms(2026, 3, day, 9, 0, 0)
            .single()
            .ok_or_else(|| AppError::internal("invalid seed event date"))?;

        let activity = Activity {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            category: Category::Technical,
            field,
            assigned_teacher_id: teacher_id,
            assigned_teacher: None,
            created_by: admin.id,
            creator: None,
            event_date,
            venue: venue.into(),
            max_participants,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        catalog::insert_activity(pool, &activity).await?;
        activity_ids.push(activity.id);
        summary.activities += 1;
    }

    let claims = [
        ("Programming Contest Winner", "Won first place in the annual programming contest", Position::First, 100, true),
        ("Robotics Workshop Completion", "Completed the robotics workshop and built a line follower", Position::Participation, 0, false),
        ("Circuit Design Runner-up", "Second place with a low-power sensor circuit design", Position::RunnerUp, 0, false),
    ];

    for (((award_title, description, position, points, is_highlighted), student_id), activity_id) in claims
        .into_iter()
        .zip(student_ids.iter().copied())
        .zip(activity_ids.iter().copied())
    {
        let achievement = achievements::insert(
            pool,
            NewAchievement {
                student_id,
                activity_id: Some(activity_id),
                award_title: award_title.into(),
                description: description.into(),
                position,
                certificate_url: String::new(),
                proof_document: String::new(),
                points,
                is_highlighted,
            },
        )
        .await?;
        summary.achievements += 1;

        // The CS claim falls in the demo admin's field and is approved.
        if is_highlighted {
            let reviewed_at = utc_now();
            let transition = workflow::review(
                achievement.status,
                AchievementStatus::Approved,
                Some("Verified"),
                admin.id,
                reviewed_at,
            )?;
            achievements::apply_review(pool, achievement.id, &transition, reviewed_at).await?;
        }
    }

    tracing::info!(
        superadmin = %superadmin.email,
        users = summary.users,
        teachers = summary.teachers,
        activities = summary.activities,
        achievements = summary.achievements,
        "demo data seeded"
    );

    Ok(summary)
}

async fn clear(pool: &SqlitePool) -> AppResult<()> {
    let mut tx = pool.begin().await?;
    for table in ["achievements", "activities", "teachers", "users"] {
        sqlx::query(&format!("DELETE FROM {table}")).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    tracing::warn!("all tables cleared");
    Ok(())
}
