mod blockquote;
mod color;
mod direction;
mod editor;
mod error;
mod format;
mod list;
mod list_thread;
mod location;
mod metadata;
mod model;
mod normalize;
mod operational;
mod selection;
mod table;
mod wrap;

pub use crate::blockquote::*;
pub use crate::color::*;
pub use crate::direction::*;
pub use crate::editor::*;
pub use crate::error::*;
pub use crate::format::*;
pub use crate::list::*;
pub use crate::list_thread::*;
pub use crate::location::*;
pub use crate::metadata::*;
pub use crate::model::*;
pub use crate::normalize::*;
pub use crate::operational::*;
pub use crate::selection::*;
pub use crate::table::*;
pub use crate::wrap::*;
