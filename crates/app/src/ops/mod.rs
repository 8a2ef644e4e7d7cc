pub mod demo;
pub mod init;
pub mod keygen;
pub mod version;

pub use demo::Demo;
pub use init::Init;
pub use keygen::Keygen;
pub use version::Version;
