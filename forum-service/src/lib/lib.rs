pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use domain::like;
pub use domain::post;
pub use domain::user;
pub use outbound::repositories;
