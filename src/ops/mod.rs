pub mod compose;
pub mod edit;
pub mod insert;
pub mod moves;

pub use compose::compose_day;
pub use edit::{adjust_level, delete_task, set_text, toggle_done};
pub use insert::{DEFAULT_PRIORITY, InsertAnchor, priority_for_new};
pub use moves::{move_down, move_up};
