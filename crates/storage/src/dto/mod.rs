pub mod activity;
pub mod common;
pub mod ranking;
pub mod user;
