use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use sha2::{Digest, Sha256};

use super::error::SnapshotError;
use super::SNAPSHOT_VERSION;
use crate::models::MatchState;

/// Upper bound on deliveries across both innings.
pub const MAX_DELIVERIES: usize = 10_000;

const CHECKSUM_LEN: usize = 32;

/// Stored form of a match.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MatchSnapshot {
    /// Snapshot format version for migration
    pub version: u32,

    /// Unix milliseconds
    pub saved_at: i64,

    pub state: MatchState,
}

impl MatchSnapshot {
    pub fn new(state: MatchState) -> Self {
        Self { version: SNAPSHOT_VERSION, saved_at: Utc::now().timestamp_millis(), state }
    }

    pub fn touch(&mut self) {
        self.saved_at = Utc::now().timestamp_millis();
    }

    pub fn saved_at_rfc3339(&self) -> String {
        Utc.timestamp_millis_opt(self.saved_at)
            .single()
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.state.current_inning_index > 1 {
            return Err(SnapshotError::Corrupted(format!(
                "current inning index {} out of range",
                self.state.current_inning_index
            )));
        }

        self.state.check_limits().map_err(|e| SnapshotError::Corrupted(e.to_string()))?;

        let deliveries = self.state.innings.iter().map(|i| i.events.len()).sum::<usize>();
        if deliveries > MAX_DELIVERIES {
            return Err(SnapshotError::DataTooLarge { size: deliveries });
        }

        Ok(())
    }
}

/// Serialize, compress and checksum a snapshot.
pub fn encode_snapshot(snapshot: &MatchSnapshot) -> Result<Vec<u8>, SnapshotError> {
    snapshot.validate()?;

    // MessagePack with field names so optional fields can be skipped
    let msgpack = to_vec_named(snapshot)?;

    let compressed = compress_prepend_size(&msgpack);

    let mut hasher = Sha256::new();
    hasher.update(&compressed);
    let checksum = hasher.finalize();

    let mut bytes = compressed;
    bytes.extend_from_slice(&checksum);
    Ok(bytes)
}

/// Verify, decompress and deserialize a snapshot.
pub fn decode_snapshot(bytes: &[u8]) -> Result<MatchSnapshot, SnapshotError> {
    // size header + checksum
    if bytes.len() < 4 + CHECKSUM_LEN {
        return Err(SnapshotError::Corrupted(format!("{} bytes is too short", bytes.len())));
    }

    let (payload, checksum) = bytes.split_at(bytes.len() - CHECKSUM_LEN);

    let mut hasher = Sha256::new();
    hasher.update(payload);
    if hasher.finalize().as_slice() != checksum {
        return Err(SnapshotError::ChecksumMismatch);
    }

    let msgpack = decompress_size_prepended(payload).map_err(|_| SnapshotError::Decompression)?;
    let snapshot: MatchSnapshot = from_slice(&msgpack)?;

    if snapshot.version > SNAPSHOT_VERSION {
        return Err(SnapshotError::VersionMismatch { found: snapshot.version, expected: SNAPSHOT_VERSION });
    }

    Ok(snapshot)
}

/// Transport form: the bare state as camelCase JSON.
pub fn snapshot_to_json(state: &MatchState) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(state)?)
}

pub fn snapshot_from_json(json: &str) -> Result<MatchState, SnapshotError> {
    Ok(serde_json::from_str(json)?)
}
