mod boundary;
mod countdown;
mod cursor;

pub use boundary::{next_boundary, BoundaryStep};
pub use countdown::{Countdown, CountdownTracker};
pub use cursor::ScheduleCursor;
