//! Record entity representing a shortened URL mapping.

/// A stored short link.
///
/// Records are created once and never removed. `is_deleted` is the only field
/// that changes after creation, and only ever from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: String,
    pub original_url: String,
    pub owner_id: String,
    pub is_deleted: bool,
}

impl Record {
    /// Creates a new, non-deleted record.
    pub fn new(key: String, original_url: String, owner_id: String) -> Self {
        Self {
            key,
            original_url,
            owner_id,
            is_deleted: false,
        }
    }

    /// Returns true if the record belongs to `owner_id`.
    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id == owner_id
    }
}

impl From<NewRecord> for Record {
    fn from(new: NewRecord) -> Self {
        Record::new(new.key, new.original_url, new.owner_id)
    }
}

/// Input data for inserting a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub key: String,
    pub original_url: String,
    pub owner_id: String,
}

impl NewRecord {
    pub fn new(
        key: impl Into<String>,
        original_url: impl Into<String>,
        owner_id: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            original_url: original_url.into(),
            owner_id: owner_id.into(),
        }
    }
}

/// Projection returned by a single-key lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordView {
    pub original_url: String,
    pub is_deleted: bool,
}

/// Projection returned by owner listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedLink {
    pub short_key: String,
    pub original_url: String,
}

/// Aggregate counters over non-deleted records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub distinct_owner_count: i64,
    pub non_deleted_record_count: i64,
}
