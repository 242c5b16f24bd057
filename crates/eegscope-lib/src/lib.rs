pub mod analysis;
pub mod channels;
pub mod config;
pub mod display;
pub mod error;
pub mod io;
pub mod plot;
pub mod session;
pub mod signal;

pub use channels::*;
pub use config::*;
pub use error::IngestError;
pub use signal::*;
