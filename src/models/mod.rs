pub mod constants;
pub mod field;
pub mod payload;
pub mod stage;
pub mod timeline;

pub use field::{FieldRecord, FieldShape, FieldValue};
pub use payload::StagePayload;
pub use stage::{StageEnvelope, StageId, StageStatus};
pub use timeline::TimelineRecord;
