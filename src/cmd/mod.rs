pub mod args;
pub mod break_cipher;
pub mod fitness;
pub mod info;
pub mod quadgrams;
pub mod streams;
pub mod transcode;
