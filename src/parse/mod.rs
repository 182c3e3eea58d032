pub mod reconcile;
pub mod tag_codec;

pub use reconcile::{reconcile_document, tasks_from_document};
pub use tag_codec::{decode_tags, encode_tags};
