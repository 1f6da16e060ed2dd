mod atomic_io;
mod sink;

pub use sink::{unique_artifact_name, ArtifactSink, DirectorySink, PersistError};
