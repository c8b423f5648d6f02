pub mod attendance;
pub mod auth;
pub mod branch;
pub mod health;
pub mod member;
pub mod package;
pub mod payment;
pub mod subscription;
