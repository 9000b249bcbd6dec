// Message identifiers.
//
// UUIDv7 embeds the creation time, so ids of messages in one session sort
// in the order they were appended.

use uuid::Uuid;

/// Generate a new UUIDv7 (timestamp-sortable).
pub fn uuidv7() -> Uuid {
    Uuid::now_v7()
}
