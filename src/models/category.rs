//! Category names. Each category gets its own directory under the history root
//! and its own file extension.

/// Composite telemetry messages ([`super::MsgRecord`]).
pub const ECS_MSG_MODEL: &str = "ECS_MsgModel";

/// Header-only records ([`super::MessageHeader`]).
pub const ECS_MSG_HEADER: &str = "ECS_MsgHeader";
