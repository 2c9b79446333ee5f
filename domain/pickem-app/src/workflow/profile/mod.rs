pub mod create;
pub mod get_selected;
pub mod list;
pub mod select;
pub mod update;
