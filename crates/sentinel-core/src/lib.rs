//! Facade crate: wires C1-C9 into the request pipeline (`analyze_request`)
//! and the standalone architecture-only entry point (`analyze_architecture`,
//! §12 resolution 4). C10 (`sentinel-llm`) and C11 (`sentinel-intent`) are
//! consumed directly by callers that need them; there is no facade wrapper
//! for those since they are independent of the file-analysis pipeline.

mod pipeline;
mod summary;

pub use pipeline::{analyze_architecture, analyze_request, AnalysisResult};
pub use summary::{summarize, Summary};
