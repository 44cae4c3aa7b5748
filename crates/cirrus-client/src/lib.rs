pub mod auth;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod paging;
pub mod poll;

pub use auth::{ServicePrincipalTokenProvider, StaticToken, TokenProvider};
pub use endpoint::Endpoints;
pub use error::ClientError;
pub use http::{ArmConnection, Response};
pub use paging::{Page, DEFAULT_MAX_PAGES};
pub use poll::{poll_until, PollOptions};
