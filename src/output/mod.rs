// Output module for serializing mapped records to GEDCOM text

pub mod generator;

pub use generator::{Generator, GeneratorOptions};
