pub mod label;
pub mod resolver;

pub use label::parse_entity_label;
pub use resolver::{EntityResolver, EntityResolverConfig};
