pub mod encoder;
pub mod error;
pub mod header;

pub use encoder::{encode, IcoContainer, IconImage};
pub use error::{EntryFault, FormatError};
