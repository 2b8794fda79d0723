pub mod app;
pub mod authz;
pub mod db;
pub mod docs;
pub mod errors;
pub mod jwt;
pub mod models;
pub mod routes;
pub mod seed;
pub mod store;
pub mod utils;
pub mod validation;
pub mod workflow;

pub use app::create_app;
