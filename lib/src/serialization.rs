//! Persistence of fitted parameters and model artifacts.
//!
//! Artifacts are plain serde structures. Two on-disk formats are supported and
//! selected by file extension: `.json` (human-editable, what the exporter
//! writes) and `.bin` (bincode).

use std::error::Error;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::PipelineError;

/// A trait for parameter representations that can be serialized to and from bytes.
///
/// Implementors should contain only plain data (e.g., `Vec<f64>`, strings),
/// never derived lookup tables.
pub trait SerializableParams: Sized {
    /// The error type returned during (de)serialization.
    type Error: Error + Send + Sync + 'static;

    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;
}

impl<T> SerializableParams for T
where
    T: Serialize + DeserializeOwned,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        bincode::deserialize(bytes)
    }
}

/// On-disk encoding of an artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactFormat {
    Json,
    Bincode,
}

impl ArtifactFormat {
    /// All formats, in lookup preference order.
    pub const ALL: [ArtifactFormat; 2] = [ArtifactFormat::Json, ArtifactFormat::Bincode];

    /// File extension used for this format.
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactFormat::Json => "json",
            ArtifactFormat::Bincode => "bin",
        }
    }

    /// Infer the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self, PipelineError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(ArtifactFormat::Json),
            Some("bin") => Ok(ArtifactFormat::Bincode),
            other => Err(PipelineError::SerializationError(format!(
                "unsupported artifact extension {:?} for {}",
                other,
                path.display()
            ))),
        }
    }
}

/// Read an artifact, choosing the decoder from the file extension.
pub fn load_artifact<T, P>(path: P) -> Result<T, PipelineError>
where
    T: Serialize + DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let format = ArtifactFormat::from_path(path)?;
    let bytes = std::fs::read(path)?;
    match format {
        ArtifactFormat::Json => Ok(serde_json::from_slice(&bytes)?),
        ArtifactFormat::Bincode => T::from_bytes(&bytes)
            .map_err(|e| PipelineError::SerializationError(e.to_string())),
    }
}

/// Write an artifact, choosing the encoder from the file extension.
pub fn save_artifact<T, P>(path: P, value: &T) -> Result<(), PipelineError>
where
    T: Serialize + DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let bytes = match ArtifactFormat::from_path(path)? {
        ArtifactFormat::Json => serde_json::to_vec_pretty(value)?,
        ArtifactFormat::Bincode => value.to_bytes()?,
    };
    std::fs::write(path, bytes)?;
    Ok(())
}
