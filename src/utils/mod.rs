pub mod phone;
pub mod response;

pub use phone::{format_params, format_phone_number};
pub use response::{ZaloError, ZaloResponse};
