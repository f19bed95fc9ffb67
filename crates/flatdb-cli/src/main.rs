//! # flatdb CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this
//! file only invokes `cli::run()` and handles process termination.
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/flatdb-cli/src/cli/)                     │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Config, logging and store wiring (mod.rs)                │
//! │  - Command execution + output (commands.rs)                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Library (crates/flatdb/)                                   │
//! │  - Store: write / read / update / delete / query / stats    │
//! │  - No knowledge of stdout/stderr or process exits           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! `commands::execute` writes to any `io::Write`, so command behaviour is unit
//! tested against an in-memory store and a byte buffer; `tests/` drives the
//! real binary end to end.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
