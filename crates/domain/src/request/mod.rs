//! Outgoing request types

mod form;
pub mod header;
mod method;
mod spec;

pub use form::{FORM_CONTENT_TYPE, FormData};
pub use header::{AUTHORIZATION, CONTENT_TYPE, Header, Headers};
pub use method::HttpMethod;
pub use spec::HttpRequest;
