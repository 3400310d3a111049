//! Data types shared across the quickplay pipeline.

mod lists;
mod page;
mod server;

pub use lists::{BlacklistSet, GreyEntry, GreylistTable, ListSet};
pub use page::{Pagination, ServerPage};
pub use server::{Classification, HostPort, RawServerDescriptor, ServerRecord};
