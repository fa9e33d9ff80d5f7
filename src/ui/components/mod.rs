pub mod history_list;
pub mod word_card;
