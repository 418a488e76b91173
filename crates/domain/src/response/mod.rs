//! Response types

mod rejection;
mod spec;

pub use rejection::Rejection;
pub use spec::HttpResponse;
