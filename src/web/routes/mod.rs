pub mod discover;
pub mod interests;
pub mod matches;
