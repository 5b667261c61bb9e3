use proc_macro::{TokenStream, TokenTree};

/// A `key = value` option of the `test` attribute.
pub(crate) enum TestOption {
    PrintExceptions(bool),
    AutoCheck(bool),
    PollIntervalMs(u64),
    ThreadName(String),
}

impl TestOption {
    /// Renders the option as a `RunnerBuilder` method call.
    pub(crate) fn to_builder_call(&self) -> String {
        match self {
            Self::PrintExceptions(v) => format!(".print_exceptions({v})"),
            Self::AutoCheck(v) => format!(".auto_check({v})"),
            Self::PollIntervalMs(ms) => {
                format!(".poll_interval(::std::time::Duration::from_millis({ms}))")
            }
            Self::ThreadName(name) => format!(".thread_name({name})"),
        }
    }
}

/// Splits a `TokenStream` into comma-separated arguments.
///
/// Each argument is returned as a `Vec<TokenTree>`.
/// Commas at the top level are used as separators.
pub(crate) fn split_args(input: TokenStream) -> Vec<Vec<TokenTree>> {
    let mut args = Vec::new();
    let mut current = Vec::new();

    for token in input {
        match &token {
            TokenTree::Punct(p) if p.as_char() == ',' => {
                if !current.is_empty() {
                    args.push(current);
                    current = Vec::new();
                }
            }
            _ => current.push(token),
        }
    }

    if !current.is_empty() {
        args.push(current);
    }

    args
}

/// Parses the attribute arguments.
///
/// Each argument must have the form `ident = literal`.
pub(crate) fn parse_options(attr: TokenStream) -> Result<Vec<TestOption>, String> {
    split_args(attr).into_iter().map(parse_option).collect()
}

fn parse_option(arg: Vec<TokenTree>) -> Result<TestOption, String> {
    let [key, eq, value] = arg.as_slice() else {
        return Err(String::from("expected `key = value`"));
    };

    let TokenTree::Ident(key) = key else {
        return Err(format!("expected an option name, found `{key}`"));
    };

    if !matches!(eq, TokenTree::Punct(p) if p.as_char() == '=') {
        return Err(format!("expected `=` after `{key}`"));
    }

    let key = key.to_string();
    let value = value.to_string();

    match key.as_str() {
        "print_exceptions" => parse_bool(&key, &value).map(TestOption::PrintExceptions),
        "auto_check" => parse_bool(&key, &value).map(TestOption::AutoCheck),
        "poll_interval_ms" => match value.parse::<u64>() {
            Ok(0) => Err(String::from("`poll_interval_ms` must be > 0")),
            Ok(ms) => Ok(TestOption::PollIntervalMs(ms)),
            Err(_) => Err(format!("`poll_interval_ms` expects an integer, found `{value}`")),
        },
        "thread_name" if value.starts_with('"') => Ok(TestOption::ThreadName(value)),
        "thread_name" => Err(format!("`thread_name` expects a string, found `{value}`")),
        _ => Err(format!("unknown option `{key}`")),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, String> {
    value
        .parse::<bool>()
        .map_err(|_| format!("`{key}` expects `true` or `false`, found `{value}`"))
}

/// Builds a `compile_error!` invocation carrying `msg`.
pub(crate) fn compile_error(msg: &str) -> TokenStream {
    format!("::core::compile_error!({msg:?});").parse().unwrap()
}
