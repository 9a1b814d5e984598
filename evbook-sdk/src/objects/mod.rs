pub mod auth;
pub mod event;

pub use auth::{LoginRequest, LoginResponse, Role};
pub use event::{
    ApproveEventRequest, EventStatus, EventView, MessageResponse, ProposeEventRequest,
    RejectEventRequest,
};
