//! Value Object Module

pub mod email;
pub mod page;
pub mod text;
pub mod user_name;

pub use email::Email;
pub use page::PageIndex;
pub use user_name::UserName;
