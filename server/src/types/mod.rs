pub mod email_entry;
pub mod rpc_request;
pub mod timestamp;

use crate::error::ValidationError;

pub trait ProtoDeserializable<T> {
    fn from_proto(proto_obj: T) -> Result<Self, ValidationError>
    where
        Self: Sized;
}

pub trait ProtoSerializable<T> {
    fn to_proto(self) -> T;
}
