pub mod config;
pub mod error;
pub mod road;
pub mod scene;
pub mod simulation;
pub mod terrain;

pub use config::*;
pub use error::*;
pub use road::*;
pub use scene::*;
pub use simulation::*;
pub use terrain::*;
