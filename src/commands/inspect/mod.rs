mod output;
mod run;
mod sample;

pub(crate) use run::run;
