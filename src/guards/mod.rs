pub mod zalo;
