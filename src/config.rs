use std::env;
use std::str::FromStr;

/// Returns the value of the named environment variable if it exists or panics.
pub fn get_variable(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| panic!("must define {} environment variable", name))
}

/// Returns the value of the named environment variable, or `default` if
/// it isn't set.
pub fn get_variable_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_owned())
}

/// Parses the named environment variable or panics with a message
/// naming the variable and the expected type.
pub fn parse_variable<T: FromStr>(name: &str, value: &str) -> T {
    value.parse().unwrap_or_else(|_| {
        panic!(
            "parse {} as {}",
            name,
            std::any::type_name::<T>()
        )
    })
}
