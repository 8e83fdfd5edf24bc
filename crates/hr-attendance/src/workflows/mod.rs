pub mod attendance;
pub mod memory;
pub mod organization;
pub mod performance;
pub mod reporting;
pub mod repository;

#[cfg(test)]
mod tests;

pub use memory::InMemoryWorkforceStore;
pub use repository::RepositoryError;
