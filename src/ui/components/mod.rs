pub mod flashcard;
pub mod history;
pub mod menu;
pub mod quiz_panel;
pub mod score_summary;
pub mod status_bar;
pub mod term_form;
pub mod term_table;
