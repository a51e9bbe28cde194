pub mod sandbox;
pub mod snapdir;
