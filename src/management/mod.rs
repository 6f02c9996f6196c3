mod sync;
mod token;

pub use sync::{EpisodeReport, PlaylistSync, SyncReport, TrackOutcome, TrackResult};
pub use token::{TokenCache, VERIFY_WINDOW_SECS, Validity};
