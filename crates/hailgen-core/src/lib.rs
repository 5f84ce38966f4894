pub mod classify;
pub mod config;
pub mod error;
pub mod script;
pub mod serialize;

pub use classify::{
    AvroArgumentSet, AvroGroup, PathClassifier, AVRO_SUFFIX, DEFAULT_SUPERPARTITIONED_KEYS,
};
pub use config::{ClassifyConfig, Config};
pub use error::{HailgenError, Result};
pub use script::{ImportScript, VatInputsScript};
pub use serialize::serialize_avro_args;
