mod accumulate;
mod output;
mod run;
#[cfg(test)]
mod tests;

pub(crate) use run::run;
