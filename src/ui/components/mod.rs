pub mod chapter_list;
pub mod dashboard;
pub mod menu;
pub mod progress_bar;
pub mod summary;
pub mod word_card;
pub mod word_list;
