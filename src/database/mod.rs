pub mod connection_repo;
pub mod current_user_repo;
pub mod population_repo;
pub mod profile_repo;
