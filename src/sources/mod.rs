//! Source acquisition: git checkouts and bundled archives.

pub mod archive;
pub mod git;

pub use archive::unpack;
pub use git::GitCheckout;
