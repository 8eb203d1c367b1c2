//! Few-shot transcript loading.
//!
//! The file format is `==`-separated blocks, alternating user and assistant
//! content, starting with a user block.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::core::types::Exchange;

/// Load and parse a few-shot transcript file.
pub fn load_few_shots(path: &Path) -> Result<Vec<Exchange>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read few shots {}", path.display()))?;
    parse_few_shots(&contents).with_context(|| format!("parse few shots {}", path.display()))
}

/// Parse `==`-separated blocks into user/assistant exchange pairs.
pub fn parse_few_shots(contents: &str) -> Result<Vec<Exchange>> {
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }
    let blocks: Vec<&str> = contents.split("==").collect();
    if blocks.len() % 2 != 0 {
        bail!(
            "expected user/assistant pairs, got {} blocks",
            blocks.len()
        );
    }
    let mut exchanges = Vec::with_capacity(blocks.len());
    for pair in blocks.chunks(2) {
        exchanges.push(Exchange::user(pair[0].trim()));
        exchanges.push(Exchange::assistant(pair[1].trim()));
    }
    Ok(exchanges)
}
