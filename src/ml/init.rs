// ============================================================
// Layer 5 — Parameter Initialisation Policy
// ============================================================
// Every learned weight in the network is Xavier-uniform and
// every bias starts at zero. Each component calls these
// builders from its own constructor, so the policy is applied
// exactly once, at construction, with no traversal afterwards.
//
// Burn's layer configs already accept an Initializer for the
// weight, but they reuse it for the bias as well. The builders
// below therefore replace the bias with zeros after init.
//
// The LSTM keeps one Linear pair per gate, so Xavier fans are
// those of a single gate block, not the fused [4·hidden] matrix.
//
// Reference: Glorot & Bengio (2010) Xavier initialisation
//            Burn Book §3 (Modules, Params)

use burn::{
    module::Param,
    nn::{
        conv::{Conv2d, Conv2dConfig},
        Embedding, EmbeddingConfig,
        GateController,
        Initializer,
        Linear, LinearConfig,
        Lstm, LstmConfig,
        PaddingConfig2d,
    },
    prelude::*,
};

/// Token id reserved for padding (and unknown words).
pub const PADDING_TOKEN: i64 = 0;

/// Xavier-uniform with unit gain.
pub fn xavier() -> Initializer {
    Initializer::XavierUniform { gain: 1.0 }
}

fn zeros_param<B: Backend>(size: usize, device: &B::Device) -> Param<Tensor<B, 1>> {
    Param::from_tensor(Tensor::zeros([size], device))
}

/// Linear layer: Xavier weight, zero bias (when `bias` is set).
pub fn linear<B: Backend>(
    d_input:  usize,
    d_output: usize,
    bias:     bool,
    device:   &B::Device,
) -> Linear<B> {
    let mut layer = LinearConfig::new(d_input, d_output)
        .with_bias(bias)
        .with_initializer(xavier())
        .init(device);
    layer.bias = layer.bias.map(|_| zeros_param(d_output, device));
    layer
}

/// 2D convolution: Xavier weight, zero bias (when `bias` is set).
pub fn conv2d<B: Backend>(
    channels: [usize; 2],
    kernel:   [usize; 2],
    padding:  [usize; 2],
    bias:     bool,
    device:   &B::Device,
) -> Conv2d<B> {
    let mut layer = Conv2dConfig::new(channels, kernel)
        .with_padding(PaddingConfig2d::Explicit(padding[0], padding[1]))
        .with_bias(bias)
        .with_initializer(xavier())
        .init(device);
    layer.bias = layer.bias.map(|_| zeros_param(channels[1], device));
    layer
}

fn zero_gate_biases<B: Backend>(gate: &mut GateController<B>, d_hidden: usize, device: &B::Device) {
    gate.input_transform.bias  = gate.input_transform.bias.take().map(|_| zeros_param(d_hidden, device));
    gate.hidden_transform.bias = gate.hidden_transform.bias.take().map(|_| zeros_param(d_hidden, device));
}

/// Single-layer LSTM: Xavier weight per gate block, zero biases.
pub fn lstm<B: Backend>(d_input: usize, d_hidden: usize, device: &B::Device) -> Lstm<B> {
    let mut lstm = LstmConfig::new(d_input, d_hidden, true)
        .with_initializer(xavier())
        .init(device);
    for gate in [
        &mut lstm.input_gate,
        &mut lstm.forget_gate,
        &mut lstm.output_gate,
        &mut lstm.cell_gate,
    ] {
        zero_gate_biases(gate, d_hidden, device);
    }
    lstm
}

/// Token embedding: Xavier weight with the padding row zeroed.
///
/// `EmbeddingConfig` has no fan information for Xavier, so the
/// table is drawn here with fan_in = features, fan_out = tokens.
pub fn padded_embedding<B: Backend>(
    tokens:   usize,
    features: usize,
    device:   &B::Device,
) -> Embedding<B> {
    let mut embedding = EmbeddingConfig::new(tokens, features).init(device);

    let weight: Param<Tensor<B, 2>> =
        xavier().init_with([tokens, features], Some(features), Some(tokens), device);
    let pad = PADDING_TOKEN as usize;
    let weight = weight
        .val()
        .detach()
        .slice_assign([pad..pad + 1, 0..features], Tensor::zeros([1, features], device));

    // Rebuilt from data so the parameter is a graph leaf on autodiff backends
    embedding.weight = Param::from_data(weight.into_data(), device);
    embedding
}
