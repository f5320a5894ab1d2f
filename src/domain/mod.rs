// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits defining the core concepts of
// the system. No Burn types, no file I/O, no ML code — this
// layer says what things ARE, not how they work, which keeps it
// unit-testable without a GPU and lets implementations be
// swapped behind the traits.
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A source/target sentence pair from the parallel corpus
pub mod sentence_pair;

// Core abstractions (traits) that other layers implement
pub mod traits;
