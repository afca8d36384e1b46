//! Mutation testing for Go source code.
//!
//! The engine parses each target file into a mutable syntax tree, walks it
//! with a catalogue of reversible mutators, and for every mutant serializes
//! the tree, deduplicates by fingerprint, materializes a mutated file, runs
//! the test suite against it and classifies the result.

pub mod ast;
pub mod diff;
pub mod engine;
pub mod error;
pub mod exec;
pub mod files;
pub mod mutation;
pub mod mutators;
pub mod output;
pub mod parse;
pub mod printer;
pub mod registry;
pub mod report;
pub mod serialize;
pub mod skip;
pub mod types;
pub mod walker;
