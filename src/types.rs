pub mod matches;
pub mod push;
