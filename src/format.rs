//! Flat-list format
//!
//! None of the parsed-tree entities have a flat-list form. The trait exists so
//! that every entity answers `from_list` / `to_list` uniformly, with an error
//! raised on call rather than a silent no-op.

use crate::error::TreeError;

pub trait ListFormat: Sized {
    /// Name used in `NotSupported` errors
    const ENTITY: &'static str;

    fn from_list(_list: &[String]) -> Result<Self, TreeError> {
        Err(TreeError::not_supported(Self::ENTITY, "from_list"))
    }

    fn to_list(&self) -> Result<Vec<String>, TreeError> {
        Err(TreeError::not_supported(Self::ENTITY, "to_list"))
    }
}
