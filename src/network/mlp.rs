//! Hand-rolled multi-layer perceptron with stochastic gradient descent
//!
//! Small enough that a dependency-free implementation beats pulling in a
//! tensor runtime: the widest layer this crate ever builds is 30 units.

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::ports::PolicyNetwork;

/// Activation kind for a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Activation {
    /// Signed square root truncated to [-1, 1]; bounded, for hidden layers
    TruncatedSqrt,
    /// Logistic function; saturating into (0, 1), for the output layer so
    /// scores match targets scaled to [0, 1]
    Sigmoid,
}

impl Activation {
    pub fn apply(self, x: f32) -> f32 {
        match self {
            Activation::TruncatedSqrt => (x.signum() * x.abs().sqrt()).clamp(-1.0, 1.0),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
        }
    }

    /// Derivative given the pre-activation and the activated output.
    ///
    /// The truncated square root's true derivative diverges at zero, so it
    /// is capped; past the truncation point it is flat.
    pub fn derivative(self, pre: f32, post: f32) -> f32 {
        match self {
            Activation::TruncatedSqrt => {
                if pre.abs() >= 1.0 {
                    0.0
                } else {
                    (0.5 / pre.abs().sqrt()).min(10.0)
                }
            }
            Activation::Sigmoid => post * (1.0 - post),
        }
    }
}

/// One fully-connected layer. Weights are stored row-major, one row of
/// `inputs` weights per output unit.
#[derive(Debug, Clone)]
struct Layer {
    weights: Vec<f32>,
    biases: Vec<f32>,
    inputs: usize,
    outputs: usize,
    activation: Activation,
}

impl Layer {
    fn forward(&self, input: &[f32]) -> (Vec<f32>, Vec<f32>) {
        let mut pre = self.biases.clone();
        for o in 0..self.outputs {
            let row = &self.weights[o * self.inputs..(o + 1) * self.inputs];
            pre[o] += row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>();
        }
        let post = pre.iter().map(|&z| self.activation.apply(z)).collect();
        (pre, post)
    }
}

/// Feed-forward network built by stacking layers on an input width
#[derive(Debug, Clone)]
pub struct Mlp {
    layers: Vec<Layer>,
    input_width: usize,
    rng: StdRng,
}

impl Mlp {
    /// Create an empty network taking `input_width` inputs
    pub fn new(input_width: usize) -> Self {
        Mlp {
            layers: Vec::new(),
            input_width,
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Create an empty network with deterministic weight initialization
    pub fn with_seed(input_width: usize, seed: u64) -> Self {
        Mlp {
            layers: Vec::new(),
            input_width,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Append a layer of `width` units, weights initialized uniformly in
    /// [-0.5, 0.5)
    pub fn add_layer(&mut self, width: usize, activation: Activation) {
        let inputs = self.layers.last().map_or(self.input_width, |l| l.outputs);
        let mut weights = vec![0.0; inputs * width];
        let mut biases = vec![0.0; width];
        for w in &mut weights {
            *w = self.rng.random_range(-0.5..0.5);
        }
        for b in &mut biases {
            *b = self.rng.random_range(-0.5..0.5);
        }
        self.layers.push(Layer {
            weights,
            biases,
            inputs,
            outputs: width,
            activation,
        });
    }

    /// Width of the final layer (the input width while no layer is stacked)
    pub fn output_width(&self) -> usize {
        self.layers.last().map_or(self.input_width, |l| l.outputs)
    }

    /// Forward pass keeping every layer's pre- and post-activation vectors
    fn forward(&self, input: &[f32]) -> Vec<(Vec<f32>, Vec<f32>)> {
        let mut activations = Vec::with_capacity(self.layers.len());
        let mut current = input.to_vec();
        for layer in &self.layers {
            let (pre, post) = layer.forward(&current);
            current.clone_from(&post);
            activations.push((pre, post));
        }
        activations
    }

    /// One gradient step on a single example; returns the squared-error loss
    fn train_one(&mut self, input: &[f32; 9], target: &[f32; 9], learning_rate: f32) -> f32 {
        let activations = self.forward(input);
        let Some((last_pre, last_post)) = activations.last() else {
            return 0.0;
        };

        let out_activation = self.layers[self.layers.len() - 1].activation;
        let mut loss = 0.0;
        let mut delta: Vec<f32> = last_post
            .iter()
            .zip(last_pre.iter())
            .zip(target.iter())
            .map(|((&post, &pre), &t)| {
                let err = post - t;
                loss += 0.5 * err * err;
                err * out_activation.derivative(pre, post)
            })
            .collect();

        for l in (0..self.layers.len()).rev() {
            let prev_post: &[f32] = if l == 0 { input } else { &activations[l - 1].1 };

            // propagate before the weights of layer l change
            let next_delta = if l > 0 {
                let layer = &self.layers[l];
                let mut prev = vec![0.0; layer.inputs];
                for (o, &d) in delta.iter().enumerate() {
                    let row = &layer.weights[o * layer.inputs..(o + 1) * layer.inputs];
                    for (p, &w) in prev.iter_mut().zip(row) {
                        *p += w * d;
                    }
                }
                let (prev_pre, prev_out) = &activations[l - 1];
                let act = self.layers[l - 1].activation;
                for ((p, &z), &y) in prev.iter_mut().zip(prev_pre).zip(prev_out) {
                    *p *= act.derivative(z, y);
                }
                prev
            } else {
                Vec::new()
            };

            let layer = &mut self.layers[l];
            for (o, &d) in delta.iter().enumerate() {
                let row = &mut layer.weights[o * layer.inputs..(o + 1) * layer.inputs];
                for (w, &x) in row.iter_mut().zip(prev_post) {
                    *w -= learning_rate * d * x;
                }
                layer.biases[o] -= learning_rate * d;
            }
            delta = next_delta;
        }

        loss
    }
}

impl PolicyNetwork for Mlp {
    fn predict(&self, inputs: &[[f32; 9]]) -> Vec<[f32; 9]> {
        inputs
            .iter()
            .map(|input| {
                let mut out = [0.0; 9];
                match self.forward(input).last() {
                    Some((_, post)) => {
                        for (slot, &v) in out.iter_mut().zip(post.iter()) {
                            *slot = v;
                        }
                    }
                    None => out.copy_from_slice(input),
                }
                out
            })
            .collect()
    }

    fn train(
        &mut self,
        inputs: &[[f32; 9]],
        targets: &[[f32; 9]],
        epochs: usize,
        learning_rate: f32,
        verbose: bool,
    ) {
        if self.layers.is_empty() || inputs.is_empty() {
            return;
        }
        for epoch in 0..epochs {
            let mut total_loss = 0.0;
            for (input, target) in inputs.iter().zip(targets.iter()) {
                total_loss += self.train_one(input, target, learning_rate);
            }
            if verbose {
                println!(
                    "epoch {epoch}: mean loss {:.6}",
                    total_loss / inputs.len() as f32
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_net(seed: u64) -> Mlp {
        let mut net = Mlp::with_seed(9, seed);
        net.add_layer(16, Activation::TruncatedSqrt);
        net.add_layer(9, Activation::Sigmoid);
        net
    }

    #[test]
    fn truncated_sqrt_is_bounded() {
        for x in [-100.0, -1.0, -0.25, 0.0, 0.25, 1.0, 100.0] {
            let y = Activation::TruncatedSqrt.apply(x);
            assert!((-1.0..=1.0).contains(&y), "apply({x}) = {y}");
        }
        assert_eq!(Activation::TruncatedSqrt.apply(0.25), 0.5);
        assert_eq!(Activation::TruncatedSqrt.apply(-0.25), -0.5);
        assert_eq!(Activation::TruncatedSqrt.apply(4.0), 1.0);
    }

    #[test]
    fn truncated_sqrt_derivative_flat_past_truncation() {
        let act = Activation::TruncatedSqrt;
        assert_eq!(act.derivative(2.0, 1.0), 0.0);
        assert_eq!(act.derivative(-2.0, -1.0), 0.0);
        assert!(act.derivative(0.25, 0.5) > 0.0);
        // capped near zero instead of diverging
        assert!(act.derivative(0.0, 0.0) <= 10.0);
    }

    #[test]
    fn sigmoid_saturates_into_unit_interval() {
        for x in [-50.0, -1.0, 0.0, 1.0, 50.0] {
            let y = Activation::Sigmoid.apply(x);
            assert!((0.0..=1.0).contains(&y));
        }
        assert!((Activation::Sigmoid.apply(0.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn predict_outputs_unit_interval_scores() {
        let net = small_net(7);
        let outputs = net.predict(&[[0.0; 9], [1.0, -1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, -1.0]]);
        assert_eq!(outputs.len(), 2);
        for scores in outputs {
            for s in scores {
                assert!((0.0..=1.0).contains(&s));
            }
        }
    }

    #[test]
    fn layer_widths_chain() {
        let net = small_net(7);
        assert_eq!(net.output_width(), 9);
        let empty = Mlp::with_seed(9, 7);
        assert_eq!(empty.output_width(), 9);
    }

    #[test]
    fn training_reduces_loss() {
        let mut net = small_net(3);
        let inputs = [[1.0, -1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, -1.0]];
        let targets = [[0.0, 0.5, 1.0, 0.0, 0.5, 0.0, 1.0, 0.0, 0.5]];

        let mse = |net: &Mlp| -> f32 {
            let out = net.predict(&inputs);
            out[0]
                .iter()
                .zip(targets[0].iter())
                .map(|(a, b)| (a - b) * (a - b))
                .sum()
        };

        let before = mse(&net);
        net.train(&inputs, &targets, 300, 0.25, false);
        let after = mse(&net);
        assert!(
            after < before,
            "loss should fall during training: {before} -> {after}"
        );
    }

    #[test]
    fn seeded_initialization_is_deterministic() {
        let a = small_net(42);
        let b = small_net(42);
        let input = [[0.0, 1.0, 0.0, -1.0, 0.0, 0.0, 1.0, 0.0, -1.0]];
        assert_eq!(a.predict(&input), b.predict(&input));
    }
}
