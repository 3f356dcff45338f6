// Handlers module

pub mod chat;
pub mod leads;
pub mod pages;

pub use chat::chat_handler;
pub use leads::leads_handler;
pub use pages::page_handler;
