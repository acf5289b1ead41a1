pub mod ui_helpers;
