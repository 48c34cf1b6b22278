//! Asset records reconstructed from storage listings.

use crate::{AssetName, OwnerId, RetentionPolicy};
use std::time::{Duration, SystemTime};

/// One stored asset as seen by a listing.
///
/// Nothing here is persisted separately: the name, size and modification time
/// all come from the storage backend, and the owner is parsed from the name.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct AssetRecord {
    /// File name inside the namespace
    file_name: String,
    /// Parsed name, if the file was named by Stowage
    asset: Option<AssetName>,
    /// Size in bytes
    size_bytes: u64,
    /// Last modification time, the timestamp of record
    modified: SystemTime,
}

impl AssetRecord {
    /// Build a record from listing data.
    pub fn new(file_name: impl Into<String>, size_bytes: u64, modified: SystemTime) -> Self {
        let file_name = file_name.into();
        let asset = AssetName::parse(&file_name);
        Self {
            file_name,
            asset,
            size_bytes,
            modified,
        }
    }

    /// Owner recovered from the name, if it parses.
    pub fn owner(&self) -> Option<&OwnerId> {
        self.asset.as_ref().map(|asset| asset.owner())
    }

    /// Age at `now`. A modification time in the future counts as age zero.
    pub fn age_at(&self, now: SystemTime) -> Duration {
        now.duration_since(self.modified).unwrap_or(Duration::ZERO)
    }

    /// Whether the record is strictly older than the policy's maximum age.
    pub fn is_expired(&self, policy: &RetentionPolicy, now: SystemTime) -> bool {
        self.age_at(now) > policy.max_age()
    }
}
