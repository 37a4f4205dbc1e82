pub mod constants;
pub mod net;
