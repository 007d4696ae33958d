pub mod percent;

pub use percent::{decode_path, decode_url, encode_component_into};
