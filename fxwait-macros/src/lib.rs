mod utils;

use proc_macro::{Delimiter, Group, TokenStream, TokenTree};

/// Runs a test body against a fresh `fxwait::AsyncRunner`.
///
/// The body sees the runner as `runner`, a `&AsyncRunner` it may freely
/// copy or move. The last-failure slot is cleared
/// before the body and checked after it: an unchecked failure fails the
/// test.
///
/// Accepted options: `print_exceptions = <bool>`, `auto_check = <bool>`,
/// `poll_interval_ms = <int>`, `thread_name = "<name>"`.
///
/// ```rust,ignore
/// #[fxwait::test(print_exceptions = false)]
/// fn computes_on_worker() {
///     let handle = runner.execute(|| 2 + 2);
///     assert_eq!(handle.wait(Duration::from_secs(1)).unwrap(), 4);
/// }
/// ```
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let options = match utils::parse_options(attr) {
        Ok(options) => options,
        Err(msg) => return utils::compile_error(&msg),
    };

    let mut tokens = item.into_iter().collect::<Vec<_>>();

    if tokens
        .iter()
        .any(|t| matches!(t, TokenTree::Ident(id) if id.to_string() == "async"))
    {
        return utils::compile_error("#[fxwait::test] does not support async functions");
    }

    let block_pos = tokens
        .iter()
        .rposition(|t| matches!(t, TokenTree::Group(g) if g.delimiter() == Delimiter::Brace));

    let Some(pos) = block_pos else {
        return utils::compile_error("#[fxwait::test] expects a function");
    };

    let block = match &tokens[pos] {
        TokenTree::Group(g) => g.stream().to_string(),
        _ => unreachable!(),
    };

    let mut builder = String::from("::fxwait::AsyncRunner::builder()");
    for option in &options {
        builder.push_str(&option.to_builder_call());
    }
    builder.push_str(".build()");

    let new_block = format!(
        "{{
        let __fxwait_runner = {builder};
        __fxwait_runner.clear_exceptions();
        {{
            let runner = &__fxwait_runner;
            (|| {{ {block} }})();
        }}
        if let ::core::result::Result::Err(failure) = __fxwait_runner.check_last_exception() {{
            ::core::panic!(\"unchecked asynchronous failure: {{}}\", failure);
        }}
    }}"
    );

    let body = match new_block.parse::<TokenStream>() {
        Ok(body) => body,
        Err(err) => return utils::compile_error(&format!("fxwait::test macro error: {err}")),
    };

    tokens[pos] = TokenTree::Group(Group::new(Delimiter::Brace, body));

    let test_attr: TokenStream = "#[::core::prelude::v1::test]".parse().unwrap();
    let mut result: Vec<TokenTree> = test_attr.into_iter().collect();
    result.extend(tokens);

    result.into_iter().collect()
}
