//! Record models: the turn written by the store, the shapes it can read back, and the stored envelope.

mod payload;
mod stored_record;
mod turn_record;

pub use payload::RecordPayload;
pub use stored_record::{RecordId, StoredRecord};
pub(crate) use stored_record::sort_oldest_first;
pub use turn_record::{TurnRecord, ROLE_ASSISTANT, ROLE_USER};
