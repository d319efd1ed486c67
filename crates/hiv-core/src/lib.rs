#![deny(missing_docs)]
#![doc = "Core parameter, error and RNG types shared by the V-HIVRAP simulation crates."]

pub mod errors;
pub mod module;
pub mod params;
pub mod rng;

pub use errors::{ErrorInfo, HivError};
pub use module::ModuleTag;
pub use params::{
    is_catalog_drug, Comorbidities, SimulationParameters, DRUG_CATALOG, MAX_DURATION_DAYS,
    MAX_MUTATION_RATE, MIN_MUTATION_RATE,
};
pub use rng::{derive_substream_seed, RngHandle};
