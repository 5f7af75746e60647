pub mod documents;
pub mod profile;
pub mod visits;
