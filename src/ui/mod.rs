pub mod components;
pub mod layout;
pub mod search_input;
pub mod theme;
