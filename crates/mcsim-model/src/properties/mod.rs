//! Dynamic-value scratch data shared between the engine and application
//! code (per-node `Data()`, per-edge `data_a`/`data_b`).

pub mod value;

pub use value::PropertyValue;
