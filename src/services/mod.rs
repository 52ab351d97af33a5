pub mod deck;
pub mod discover;
pub mod error;
pub mod interests;
pub mod matches;
pub mod matching;
pub mod population_feed;
pub mod store;
pub mod swipe;
