mod bootstrap;
mod loop_runner;
mod navigation;
mod settings;

pub(crate) use bootstrap::build_app;
pub(crate) use loop_runner::run;
