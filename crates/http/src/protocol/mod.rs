//! Protocol types shared by the codec and the connection layer.
//!
//! - **Message Handling** (`message`): [`Message`], [`PayloadItem`] and [`PayloadSize`]
//! - **Request** (`request`): [`RequestHead`], the ordered request lines plus body
//! - **Response** (`response`): [`ResponseHead`], the ordered response lines
//! - **Result** (`result`): [`RequestResult`], the outcome handed to callers
//! - **Error Handling** (`error`): [`HttpError`], [`ParseError`], [`SendError`]

mod message;
pub use message::Message;
pub use message::PayloadItem;
pub use message::PayloadSize;

mod request;
pub use request::RequestHead;

mod response;
pub use response::ResponseHead;

mod result;
pub use result::RequestResult;
pub use result::Response;

pub mod cookie;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
