//! Ports: repository contracts and external collaborators.

pub mod directory;
pub mod order_repository;
pub mod specification;
pub mod user_repository;

pub use directory::{CustomerDirectory, UserDirectory};
pub use order_repository::{OrderRepository, CLAMPED_PAGE_SIZE, DEFAULT_PAGE_SIZE};
pub use specification::{NativeClause, Specification, SpecificationMatches};
pub use user_repository::UserRepository;
