pub mod booking_repo;
pub mod mongo_client;
pub mod package_repo;
pub mod repository_error;
pub mod user_repo;
