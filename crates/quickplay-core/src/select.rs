use crate::types::{Classification, ServerRecord};

/// Selects the server a player should join, or `None` when nothing
/// qualifies.
///
/// Candidates are stable-sorted by current player count, descending; equal
/// counts keep their catalog order, so identical input sequences always
/// select the same server. The sort key is `players`, not `max_players`: a
/// busy 24-slot server beats an empty 32-slot one.
///
/// The sorted list is then walked in order:
/// - `Blacklisted` records are skipped.
/// - The first `Greylisted` record ends the walk and is selected as-is,
///   full or not. The caller is expected to surface its reason instead of
///   silently hiding the flagged option.
/// - A `Clear` record is selected only if it still has room.
///
/// An exhausted walk is a normal outcome, not an error.
#[must_use]
pub fn pick(mut records: Vec<ServerRecord>) -> Option<ServerRecord> {
    records.sort_by(|a, b| b.players.cmp(&a.players));
    for record in records {
        match record.classification {
            Classification::Blacklisted => {}
            Classification::Greylisted { .. } => return Some(record),
            Classification::Clear | Classification::Unclassified => {
                if record.has_room() {
                    return Some(record);
                }
            }
        }
    }
    None
}
