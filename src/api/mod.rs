mod client;

pub use client::HttpChatStore;
