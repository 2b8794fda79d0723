pub mod achievements;
pub mod activities;
pub mod auth;
pub mod health;
pub mod reports;
pub mod superadmin;
pub mod teachers;
pub mod users;
