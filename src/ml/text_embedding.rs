use burn::{nn::Embedding, prelude::*};

use crate::ml::init::PADDING_TOKEN;

/// Look up token embeddings, forcing padded positions to exactly zero.
///
/// The padding row of the table starts at zero; masking the output
/// as well keeps it that way, since padded positions then contribute
/// no gradient to row 0.
///
/// tokens: [batch, len] → [batch, len, features]
pub fn embed_tokens<B: Backend>(embedding: &Embedding<B>, tokens: Tensor<B, 2, Int>) -> Tensor<B, 3> {
    let [batch, seq_len] = tokens.dims();
    let keep = tokens
        .clone()
        .equal_elem(PADDING_TOKEN)
        .bool_not()
        .float()
        .reshape([batch, seq_len, 1]);

    let embedded = embedding.forward(tokens);
    let [_, _, features] = embedded.dims();
    embedded * keep.expand([batch, seq_len, features])
}
