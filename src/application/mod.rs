// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal each:
// training a model, or translating a sentence with a trained
// one. No ML math, no printing, no direct file formats here —
// only workflow coordination.
//
// Reference: Clean Architecture pattern, Rust Book §7 (Modules)

// The training workflow
pub mod train_use_case;

// The translation workflow
pub mod translate_use_case;
