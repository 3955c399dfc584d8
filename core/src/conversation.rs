//! Conversation resolution
//!
//! Precedence, lowest to highest: persisted id, `--conversation`, `--new`.
//! An id of `0` is treated as absent wherever it appears.

/// Conversation to submit with; `None` lets the server allocate one.
///
/// `force_new` wins even over an explicit id: the pair is an intentional
/// override, not a conflict.
pub fn resolve_conversation(
  persisted: Option<u64>,
  explicit: Option<u64>,
  force_new: bool,
) -> Option<u64> {
  if force_new {
    return None;
  }
  non_zero(explicit).or(non_zero(persisted))
}

/// Conversation to persist once the server has answered: the explicit id if
/// one was given, otherwise the id the server returned.
pub fn conversation_to_persist(explicit: Option<u64>, returned: u64) -> u64 {
  non_zero(explicit).unwrap_or(returned)
}

fn non_zero(id: Option<u64>) -> Option<u64> {
  id.filter(|id| *id != 0)
}
