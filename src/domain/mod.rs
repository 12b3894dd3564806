// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits describing the problem:
// questions about images and the answers predicted for them.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or network calls
//   - Only plain Rust structs, enums, and traits
//
// Tensors only appear once records reach the data layer's
// batcher (Layer 4) and the model (Layer 5).
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// One question about one image, as stored on disk
pub mod record;

// A ranked answer produced by the model
pub mod prediction;

// Core abstractions (traits) that other layers implement
pub mod traits;
