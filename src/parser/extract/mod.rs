pub mod links;
pub mod profile;

pub use profile::RawProfile;
