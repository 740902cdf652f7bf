/// View helpers for the two panels of the main window
pub mod form;
pub mod results;
