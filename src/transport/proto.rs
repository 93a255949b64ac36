//! Wire messages for `authzed.api.v1.PermissionsService/CheckPermission`.
//!
//! Only the fields a plain check needs are declared. Fields the server sends
//! that are not listed here are skipped by the decoder.

use crate::types::{CheckRequest, ObjectReference, SubjectReference};

/// Full method path of the check RPC.
pub(crate) const CHECK_PERMISSION_PATH: &str =
    "/authzed.api.v1.PermissionsService/CheckPermission";

#[derive(Clone, PartialEq, ::prost::Message)]
pub(crate) struct ObjectReferenceProto {
    #[prost(string, tag = "1")]
    pub object_type: String,
    #[prost(string, tag = "2")]
    pub object_id: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub(crate) struct SubjectReferenceProto {
    #[prost(message, optional, tag = "1")]
    pub object: Option<ObjectReferenceProto>,
    #[prost(string, tag = "2")]
    pub optional_relation: String,
}

/// Field 1 (`consistency`) is left unset, which the server treats as
/// minimize-latency.
#[derive(Clone, PartialEq, ::prost::Message)]
pub(crate) struct CheckPermissionRequest {
    #[prost(message, optional, tag = "2")]
    pub resource: Option<ObjectReferenceProto>,
    #[prost(string, tag = "3")]
    pub permission: String,
    #[prost(message, optional, tag = "4")]
    pub subject: Option<SubjectReferenceProto>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub(crate) struct ZedToken {
    #[prost(string, tag = "1")]
    pub token: String,
}

/// `permissionship` is read as a plain `int32` so codes added to the enum
/// later arrive intact.
#[derive(Clone, PartialEq, ::prost::Message)]
pub(crate) struct CheckPermissionResponse {
    #[prost(message, optional, tag = "1")]
    pub checked_at: Option<ZedToken>,
    #[prost(int32, tag = "2")]
    pub permissionship: i32,
}

impl From<&ObjectReference> for ObjectReferenceProto {
    fn from(object: &ObjectReference) -> Self {
        Self {
            object_type: object.object_type().to_owned(),
            object_id: object.object_id().to_owned(),
        }
    }
}

impl From<&SubjectReference> for SubjectReferenceProto {
    fn from(subject: &SubjectReference) -> Self {
        Self {
            object: Some(subject.object().into()),
            optional_relation: subject.optional_relation().unwrap_or_default().to_owned(),
        }
    }
}

impl From<&CheckRequest> for CheckPermissionRequest {
    fn from(request: &CheckRequest) -> Self {
        Self {
            resource: Some(request.resource().into()),
            permission: request.permission().to_owned(),
            subject: Some(request.subject().into()),
        }
    }
}
