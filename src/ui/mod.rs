pub mod graph_widget;
pub mod process_tab;
