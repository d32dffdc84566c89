pub mod calculator_panel;
pub mod dashboard;
pub mod exam_header;
pub mod history_table;
pub mod instructions;
pub mod progress_bar;
pub mod question_grid;
pub mod question_view;
pub mod review_panel;
