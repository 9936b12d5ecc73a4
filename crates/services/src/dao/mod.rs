pub mod base;
pub mod chat;

pub use base::{BaseDao, DaoError, DaoResult, PaginatedResult, PaginationParams};
pub use chat::ChatDao;
