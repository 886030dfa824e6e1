pub mod post_repository;
pub mod session_repository;
pub mod user_repository;

#[cfg(test)]
pub mod memory;
