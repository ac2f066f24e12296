//! Network port - the contract the self-play core consumes
//!
//! The core treats the policy network as an external collaborator: it feeds
//! well-formed finite inputs in [-1, 1] and targets in [0, 1], and expects
//! 9 scores back per board. The numeric implementation behind the trait is
//! interchangeable; `crate::network::Mlp` is the adapter shipped with this
//! crate, and tests substitute deterministic stand-ins.

/// Feed-forward predictor/trainer over 9-cell board vectors.
///
/// Implementations are constructed with an input width of 9 and stacked
/// layers of their own choosing; the output layer must be saturating
/// (logistic-like) so scores land in [0, 1], matching the training targets.
pub trait PolicyNetwork {
    /// Run inference on a batch of boards. Pure: no training side effect.
    fn predict(&self, inputs: &[[f32; 9]]) -> Vec<[f32; 9]>;

    /// Run `epochs` passes of gradient-based updates over the batch at the
    /// given learning rate, mutating the network's weights in place.
    fn train(
        &mut self,
        inputs: &[[f32; 9]],
        targets: &[[f32; 9]],
        epochs: usize,
        learning_rate: f32,
        verbose: bool,
    );
}
