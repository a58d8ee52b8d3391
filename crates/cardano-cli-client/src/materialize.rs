//! Side-artifact materialization
//!
//! Datums, redeemers and metadata are passed to the node tool as files. The
//! argument builder asks a [`Materializer`] to create each one and embeds the
//! returned reference verbatim. Creating and cleaning up the files is the
//! materializer's business.

use forge_core::MaterializeError;

/// Artifact kinds requested while building arguments
pub mod kind {
    pub const INPUT_DATUM: &str = "input-datum";
    pub const INPUT_REDEEMER: &str = "input-redeemer";
    pub const OUTPUT_DATUM_EMBED: &str = "output-datum-embed";
    pub const MINT_REDEEMER: &str = "mint-redeemer";
    pub const METADATA_JSON: &str = "metadata-json";
}

/// Creates a named artifact holding `content` and returns a reference to it
pub trait Materializer {
    fn materialize(&mut self, kind: &str, content: &str) -> Result<String, MaterializeError>;
}

impl<F> Materializer for F
where
    F: FnMut(&str, &str) -> Result<String, MaterializeError>,
{
    fn materialize(&mut self, kind: &str, content: &str) -> Result<String, MaterializeError> {
        self(kind, content)
    }
}

/// An artifact recorded by [`MemoryMaterializer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: String,
    pub reference: String,
    pub content: String,
}

/// Keeps artifacts in memory. References are `{kind}-{n}`, numbered from 0
/// in request order. Useful for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryMaterializer {
    artifacts: Vec<Artifact>,
}

impl MemoryMaterializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn get(&self, reference: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.reference == reference)
    }
}

impl Materializer for MemoryMaterializer {
    fn materialize(&mut self, kind: &str, content: &str) -> Result<String, MaterializeError> {
        let reference = format!("{}-{}", kind, self.artifacts.len());
        self.artifacts.push(Artifact {
            kind: kind.to_string(),
            reference: reference.clone(),
            content: content.to_string(),
        });
        Ok(reference)
    }
}
