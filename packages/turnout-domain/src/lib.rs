pub mod classify;
pub mod field;
pub mod paging;
pub mod pattern;
pub mod scope;
