//! Request and response data transfer objects.

pub mod notification_dto;

pub use notification_dto::{
    ConnectionCountResponse, MAX_KIND_LEN, PublishNotificationRequest,
    PublishNotificationResponse,
};
