pub mod zalo;

pub use zalo::ZaloClient;
