mod dates;
mod document;
pub mod fields;
mod journal;
mod numeric;

pub use dates::*;
pub use document::*;
pub use journal::*;
pub use numeric::*;
