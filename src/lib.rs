pub mod calendar;
pub mod io;
pub mod model;
pub mod ops;
pub mod quotes;
pub mod search;
pub mod tui;
