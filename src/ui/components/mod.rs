pub mod notice;
pub mod save_dialog;
pub mod sort_menu;
pub mod spinner;
pub mod track_row;
