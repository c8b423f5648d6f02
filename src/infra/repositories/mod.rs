pub mod postgres_attendance_repo;
pub mod postgres_branch_repo;
pub mod postgres_member_repo;
pub mod postgres_package_repo;
pub mod postgres_payment_repo;
pub mod postgres_sequence_repo;
pub mod postgres_subscription_repo;
pub mod sqlite_attendance_repo;
pub mod sqlite_branch_repo;
pub mod sqlite_member_repo;
pub mod sqlite_package_repo;
pub mod sqlite_payment_repo;
pub mod sqlite_sequence_repo;
pub mod sqlite_subscription_repo;
