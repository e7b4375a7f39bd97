use crate::{
    error::ValidationError,
    proto,
    storage::{BatchQuery, EmailEntry},
    types::ProtoDeserializable,
};

/// A validated RPC call, ready to run against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcMethod {
    CreateEmail { email: String },
    GetEmail { email: String },
    GetEmailBatch(BatchQuery),
    UpdateEmail(EmailEntry),
    DeleteEmail { email: String },
}

impl RpcMethod {
    /// Procedure name, for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateEmail { .. } => "CreateEmail",
            Self::GetEmail { .. } => "GetEmail",
            Self::GetEmailBatch(_) => "GetEmailBatch",
            Self::UpdateEmail(_) => "UpdateEmail",
            Self::DeleteEmail { .. } => "DeleteEmail",
        }
    }
}

impl ProtoDeserializable<proto::RpcRequest> for RpcMethod {
    fn from_proto(request: proto::RpcRequest) -> Result<Self, ValidationError> {
        use proto::rpc_request::Method;

        match request.method {
            Some(Method::CreateEmail(request)) => {
                if request.email.is_empty() {
                    return Err(ValidationError::MissingEmail);
                }
                Ok(Self::CreateEmail {
                    email: request.email,
                })
            }
            Some(Method::GetEmail(request)) => Ok(Self::GetEmail {
                email: request.email,
            }),
            Some(Method::GetEmailBatch(request)) => Ok(Self::GetEmailBatch(BatchQuery::new(
                i64::from(request.page),
                i64::from(request.count),
            )?)),
            Some(Method::UpdateEmail(request)) => {
                let entry = request.email_entry.ok_or(ValidationError::MissingEntry)?;
                Ok(Self::UpdateEmail(EmailEntry::from_proto(entry)?))
            }
            Some(Method::DeleteEmail(request)) => Ok(Self::DeleteEmail {
                email: request.email,
            }),
            None => Err(ValidationError::MissingMethod),
        }
    }
}
