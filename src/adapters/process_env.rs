use crate::ports::ProcessEnv;
use std::env;

pub struct CurrentProcessEnv;

impl ProcessEnv for CurrentProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }

    fn set_var(&self, name: &str, value: &str) {
        env::set_var(name, value);
    }
}
