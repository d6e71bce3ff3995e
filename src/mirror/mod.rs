//! Orchestration of a complete mirror run and its post-run checks.
//!
//! [`run_mirror`] drives the phases in order:
//!
//! 1. Create the mirror root and fixed subdirectories
//! 2. Fetch the seed groups sequentially
//! 3. Scan the downloaded bundles for asset references
//! 4. Resolve, scope and deduplicate the references
//! 5. Fetch the assets on the bounded worker pool
//! 6. Write `config.local.js`
//!
//! [`verify_mirror`] is run afterwards regardless of how the run ended.

mod local_config;
mod pipeline;
mod verify;

pub use local_config::{LOCAL_CONFIG_CONTENTS, LOCAL_CONFIG_FILE, write_local_config};
pub use pipeline::{MirrorError, MirrorOutcome, prepare_directories, run_mirror};
pub use verify::{VerificationReport, verify_mirror};
