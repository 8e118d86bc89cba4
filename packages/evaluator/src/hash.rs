//! Content hashing for change detection
//!
//! Every hashed directive folds its key into a running hash, so a node's
//! hash changes whenever it or anything rendered before it changes.

use crc32fast::Hasher;
use std::sync::atomic::{AtomicU32, Ordering};
use stencil_dom::{Document, NodeId};
use tracing::warn;

/// Attributes that record outcome and so never contribute to a hash
const UNHASHED: &[&str] = &["data-hash", "data-error", "data-warning"];

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// How a hashed directive affects the running hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Hashed but never advances the running hash
    Constant,
    /// Advances the running hash
    Cumulative,
    /// Hashes differently every time and advances the running hash
    Volatile,
}

#[derive(Debug, Clone, Default)]
pub struct ContentHasher {
    running: String,
}

impl ContentHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the running hash; done at the start of each render pass
    pub fn reset(&mut self) {
        self.running.clear();
    }

    pub fn running(&self) -> &str {
        &self.running
    }

    /// Hash a node, optionally including its attributes and text
    pub fn hash(
        &mut self,
        doc: &Document,
        node: NodeId,
        effect: Effect,
        attributes: bool,
        text: bool,
        extra: &str,
    ) -> String {
        let mut key = self.running.clone();
        if attributes {
            if let Some(attributes) = doc.attributes(node) {
                for (name, value) in attributes {
                    if !UNHASHED.contains(&name.as_str()) {
                        key.push_str(name);
                        key.push(':');
                        key.push_str(value);
                    }
                }
            }
        }
        if text {
            key.push_str(&doc.text(node));
        }
        key.push_str(extra);

        if effect == Effect::Volatile {
            key.push_str(&entropy().to_string());
        }

        let mut hasher = Hasher::new();
        hasher.update(key.as_bytes());
        let hash = encode(hasher.finalize());

        if effect != Effect::Constant {
            self.running = hash.clone();
        }
        hash
    }
}

/// A random number for volatile hashes
fn entropy() -> u32 {
    static FALLBACK: AtomicU32 = AtomicU32::new(0);
    match getrandom::u32() {
        Ok(value) => value,
        Err(error) => {
            warn!(%error, "No system randomness, volatile hash uses a counter");
            FALLBACK.fetch_add(1, Ordering::Relaxed)
        }
    }
}

/// Encode an integer in base 62, most significant digit first
pub fn encode(mut value: u32) -> String {
    let base = ALPHABET.len() as u32;
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(ALPHABET[(value % base) as usize] as char);
        value /= base;
    }
    digits.iter().rev().collect()
}
