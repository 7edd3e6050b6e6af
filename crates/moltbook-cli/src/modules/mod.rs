pub(crate) mod discover;
pub(crate) mod system;
pub(crate) mod verbs;
