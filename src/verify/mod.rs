pub mod assessor;
pub mod checksum;
pub mod executor;
pub mod keys;
pub mod provenance;
pub mod signature;

