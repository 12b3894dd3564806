// ============================================================
// Layer 5 — Recurrent Question Encoder
// ============================================================
// token ids → embedding → dropout → tanh → LSTM → final cell state
//
// Questions in a batch have different lengths and are padded
// with id 0. Burn's Lstm is driven one token at a time from the
// carried state, but an example's (hidden, cell) pair only
// advances while t < length.
// After the loop every row therefore holds the state reached at
// that question's last real token, the same result a packed
// sequence would give, with no padding steps leaking in.
//
// The sentence vector is the final CELL state c_T, not h_T.
//
// Reference: Hochreiter & Schmidhuber (1997) LSTM
//            Kazemi & Elqursh (2017) Show, Ask, Attend, and Answer

use burn::{
    nn::{Dropout, DropoutConfig, Embedding, Lstm, LstmState},
    prelude::*,
};

use crate::ml::init;
use crate::ml::mode::{self, Mode};
use crate::ml::text_embedding::embed_tokens;

// ─── LstmTextProcessor ────────────────────────────────────────────────────────
#[derive(Module, Debug)]
pub struct LstmTextProcessor<B: Backend> {
    embedding: Embedding<B>,
    dropout:   Dropout,
    lstm:      Lstm<B>,
    features:  usize,
}

impl<B: Backend> LstmTextProcessor<B> {
    pub fn new(
        embedding_tokens:   usize,
        embedding_features: usize,
        lstm_features:      usize,
        drop:               f64,
        device:             &B::Device,
    ) -> Self {
        Self {
            embedding: init::padded_embedding(embedding_tokens, embedding_features, device),
            dropout:   DropoutConfig::new(drop).init(),
            lstm:      init::lstm(embedding_features, lstm_features, device),
            features:  lstm_features,
        }
    }

    /// q: [batch, len] token ids, q_len: [batch] true lengths (>= 1)
    /// → [batch, lstm_features]
    pub fn forward(&self, q: Tensor<B, 2, Int>, q_len: Tensor<B, 1, Int>, mode: Mode) -> Tensor<B, 2> {
        let embedded = embed_tokens(&self.embedding, q);
        let tanhed   = mode::dropout(&self.dropout, embedded, mode).tanh();

        let [batch, seq_len, d_embed] = tanhed.dims();
        let device  = tanhed.device();
        let lengths = q_len.reshape([batch, 1]);

        let mut hidden = Tensor::<B, 2>::zeros([batch, self.features], &device);
        let mut cell   = Tensor::<B, 2>::zeros([batch, self.features], &device);

        for t in 0..seq_len {
            let x_t = tanhed.clone().slice([0..batch, t..t + 1, 0..d_embed]);
            let state = LstmState::new(cell.clone(), hidden.clone());
            let (_, LstmState { cell: next_cell, hidden: next_hidden }) = self.lstm.forward(x_t, Some(state));

            // Rows whose question has already ended keep their state
            let active = lengths
                .clone()
                .greater_elem(t as i64)
                .expand([batch, self.features]);
            hidden = hidden.mask_where(active.clone(), next_hidden);
            cell   = cell.mask_where(active, next_cell);
        }

        cell
    }
}
