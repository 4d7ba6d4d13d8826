mod blob;

pub use blob::*;
