pub mod kind;
pub mod record;

pub use kind::ModelKind;
pub use record::{AttrValue, Record};
