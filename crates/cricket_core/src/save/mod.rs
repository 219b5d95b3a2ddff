// Match snapshots: JSON for transport, MessagePack + LZ4 + SHA-256 for storage,
// versioned with migration.

pub mod error;
pub mod format;
pub mod manager;
pub mod migration;

pub use error::SnapshotError;
pub use format::{
    decode_snapshot, encode_snapshot, snapshot_from_json, snapshot_to_json, MatchSnapshot,
};
pub use manager::{FileStore, MemoryStore, SnapshotInfo, SnapshotStore};
pub use migration::migrate_snapshot;

pub const SNAPSHOT_VERSION: u32 = 1;
