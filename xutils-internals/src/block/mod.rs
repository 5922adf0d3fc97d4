//! Module containing the owned heap block type

mod layout;
mod raw;

pub use self::{layout::BLOCK_ALIGN, raw::RawBlock};
