/// Dental Experts - clinic management server
///
/// Patient signup and login, appointment booking with status-change
/// notifications, contact inquiries, doctor and rating management, and
/// treatment reports with PDF export, served over a JSON API.
pub mod accounts;
pub mod api;
pub mod appointments;
pub mod auth;
pub mod config;
pub mod contacts;
pub mod context;
pub mod db;
pub mod doctors;
pub mod error;
pub mod mailer;
pub mod notify;
pub mod ratings;
pub mod reports;
pub mod server;
pub mod uploads;
