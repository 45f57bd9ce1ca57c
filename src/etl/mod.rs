//! ETL pipeline
//!
//! Extract the spot price from the HTTP API, validate the payload shape and
//! load it into the quote store, then sleep and repeat.

mod error;
mod extract;
mod load;
mod pipeline;
mod poller;
mod timing;
mod transform;

pub use error::EtlError;
pub use extract::Extractor;
pub use load::Loader;
pub use pipeline::Pipeline;
pub use poller::{Poller, PollerState};
pub use timing::{MemorySink, MetricsSink, Stage, StageTiming, TimingSink};
pub use transform::{validate, ValidationError};
