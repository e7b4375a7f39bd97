use crate::{
    error::ValidationError,
    proto,
    storage::EmailEntry,
    types::{
        ProtoDeserializable, ProtoSerializable,
        timestamp::{from_wire_seconds, to_wire_seconds},
    },
};

impl ProtoSerializable<proto::EmailEntry> for EmailEntry {
    fn to_proto(self) -> proto::EmailEntry {
        proto::EmailEntry {
            id: self.id,
            email: self.email,
            confirmed_at: to_wire_seconds(self.confirmed_at),
            opt_out: self.opt_out,
        }
    }
}

/// A lookup result: `None` becomes a response with no entry.
impl ProtoSerializable<proto::EmailResponse> for Option<EmailEntry> {
    fn to_proto(self) -> proto::EmailResponse {
        proto::EmailResponse {
            email_entry: self.map(ProtoSerializable::to_proto),
        }
    }
}

impl ProtoSerializable<proto::EmailBatchResponse> for Vec<EmailEntry> {
    fn to_proto(self) -> proto::EmailBatchResponse {
        proto::EmailBatchResponse {
            email_entries: self.into_iter().map(ProtoSerializable::to_proto).collect(),
        }
    }
}

impl ProtoDeserializable<proto::EmailEntry> for EmailEntry {
    fn from_proto(entry: proto::EmailEntry) -> Result<Self, ValidationError> {
        if entry.email.is_empty() {
            return Err(ValidationError::MissingEmail);
        }
        Ok(Self {
            id: entry.id,
            email: entry.email,
            confirmed_at: from_wire_seconds(entry.confirmed_at),
            opt_out: entry.opt_out,
        })
    }
}
