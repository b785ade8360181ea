//! XHTML rendering of the document body.

pub mod inline;
pub mod section;
