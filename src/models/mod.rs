pub mod orchard_state;
pub mod phenology;
pub mod recommendation;
pub mod snapshot;
pub mod thresholds;

pub use orchard_state::*;
pub use phenology::*;
pub use recommendation::*;
pub use snapshot::*;
pub use thresholds::*;
