mod actions;
pub(crate) mod args;

pub(crate) use actions::handle_verb;
pub(crate) use args::bind_args;
