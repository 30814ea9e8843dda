pub mod request_url;

pub use request_url::{RequestUrl, FORWARDED_PROTO_HEADER};
