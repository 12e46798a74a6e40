pub mod authority;
pub mod layout;
pub mod property;
