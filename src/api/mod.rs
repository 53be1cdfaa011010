pub mod path;

pub use path::{api_url, encode_segment};
