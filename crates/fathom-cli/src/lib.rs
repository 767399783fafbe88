//! # Fathom CLI
//!
//! Command-line front end for the utilization and concurrency estimators.
//!
//! ## Usage
//!
//! ```bash
//! # MFU and bandwidth utilization for observed latencies
//! fathom mfu --hardware "NVIDIA A100 80GB" --model Llama-2-7b \
//!     --first-token-ms 50 --tpot-ms 10 --context-length 2048 --generated-length 128
//!
//! # How many 4k-token requests fit on eight H100s
//! fathom --output json concurrency --hardware "NVIDIA H100 80GB" \
//!     --model meta-llama/Llama-2-70b-hf --device-count 8 --context-length 4096
//!
//! # Describe a bottleneck label and list the presets
//! fathom describe memory
//! fathom presets hardware
//! ```

pub mod cli_options;

pub use cli_options::{Cli, Commands};
