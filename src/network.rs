//! Feed-forward network adapter implementing the network port

pub mod mlp;

pub use mlp::{Activation, Mlp};
