pub mod decode;
pub mod frames;
pub mod source;
