pub mod assemble;
pub mod inspect;
pub mod manifest;
pub mod plan;
pub mod record;
pub mod run;

pub use assemble::*;
pub use inspect::*;
pub use manifest::*;
pub use plan::*;
pub use record::*;
pub use run::*;
