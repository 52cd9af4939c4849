mod common;
mod properties;
mod session;
mod validation;
mod with_replacement;
mod without_replacement;
