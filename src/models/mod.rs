pub mod stock;
pub mod chat;
pub mod response;

pub use stock::*;
pub use chat::*;
pub use response::*;
