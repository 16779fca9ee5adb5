//! Domain entities - the core business objects.

mod page;
mod post;
mod user;

pub use page::Page;
pub use post::{Post, PostChanges, PostInput};
pub use user::User;
