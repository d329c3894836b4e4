//! Adversarial scenarios. Every test here asserts that an attack fails and
//! leaves no stored state behind.

pub mod payloads;
pub mod spoofing;
