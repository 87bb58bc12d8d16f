pub mod books;
pub mod clubs;
pub mod discussions;
pub mod meetings;
pub mod ratings;
