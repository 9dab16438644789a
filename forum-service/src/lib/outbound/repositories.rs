pub mod like;
pub mod memory;
pub mod post;
pub mod user;

pub use like::PostgresLikeRepository;
pub use memory::InMemoryStore;
pub use post::PostgresPostRepository;
pub use user::PostgresUserRepository;
