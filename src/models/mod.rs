pub mod error_code;
pub mod otp;
pub mod request;
pub mod token;

pub use error_code::*;
pub use otp::*;
pub use request::*;
pub use token::*;
