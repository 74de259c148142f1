pub mod mapping;
pub mod mapping_pair;
pub mod mapping_status;

pub use mapping::Mapping;
pub use mapping_pair::MappingPair;
pub use mapping_status::MappingStatus;
