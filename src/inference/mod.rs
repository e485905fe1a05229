pub mod backend;
pub mod client;
pub mod sse;

pub use backend::{decode_event_stream, ChatBackend, DeltaStream, HfInferenceBackend};
pub use client::{accumulate, SnapshotStream, SwarmClient};
pub use sse::{SseEvent, SseParser};
