//! Content module - posts, their front-matter, and the post store

mod filename;
mod frontmatter;
pub mod loader;
pub mod markdown;
mod post;
mod store;

pub use filename::PostName;
pub use frontmatter::{parse_date, FrontMatter};
pub use loader::{ContentLoader, LoadFailure, LoadedSite};
pub use post::Post;
pub use store::PostStore;
