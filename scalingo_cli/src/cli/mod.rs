mod apps;
mod common;
mod request;
mod root;
mod variables;

pub(crate) use root::get_args;
