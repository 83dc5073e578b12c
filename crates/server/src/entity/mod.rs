pub mod contest;
pub mod problem;
pub mod registration;
pub mod submission;
pub mod user;
