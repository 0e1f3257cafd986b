// Adapters layer: concrete implementations of the domain ports.

pub mod artifact;

pub use artifact::{ArtifactModel, Estimator, ModelArtifact, TreeNode};
