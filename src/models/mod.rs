pub mod calendar;
pub mod entry;
pub mod image;
