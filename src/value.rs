mod complex;
mod custom;
mod list;
mod map;
mod shared;
mod time;
mod variant;
mod vector;

pub use complex::*;
pub use custom::*;
pub use list::*;
pub use map::*;
pub use shared::*;
pub use time::*;
pub use variant::*;
pub use vector::*;
