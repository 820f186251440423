use jaq_core::{compile::Undefined, load, Compiler, Ctx, RcIter};
use jaq_json::Val;
use serde_json::Value;

use crate::error::ModelError;

/// Run a jq filter over one document and collect every output.
pub fn run_jaq(filter_src: &str, input: &Value) -> Result<Vec<Value>, ModelError> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File { code: filter_src, path: () };

    let modules = loader
        .load(&arena, program)
        .map_err(format_parse_errors)?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(format_undefined_errors)?;

    let inputs = RcIter::new(core::iter::empty());
    let outputs = filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

    let mut out = Vec::new();
    for item in outputs {
        let v = item.map_err(|e| ModelError::Jq(format!("{e:?}")))?;
        // Val: Display -> JSON text
        let v = serde_json::from_str(&v.to_string()).map_err(ModelError::JqOutput)?;
        out.push(v);
    }
    tracing::debug!(filter = filter_src, outputs = out.len(), "jq filter applied");
    Ok(out)
}

fn format_parse_errors(
    errs: Vec<(load::File<&str, ()>, load::Error<&str>)>,
) -> ModelError {
    let mut s = String::new();
    for (file, err) in errs {
        s.push_str(&format!("parse error: {err:?} in `{}`\n", file.code));
    }
    ModelError::Jq(s)
}

fn format_undefined_errors(
    errs: Vec<(load::File<&str, ()>, Vec<(&str, Undefined)>)>,
) -> ModelError {
    let mut s = String::new();
    for (file, list) in errs {
        for (name, undef) in list {
            s.push_str(&format!("undefined `{name}`: {undef:?} in `{}`\n", file.code));
        }
    }
    ModelError::Jq(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn selects_subdocuments() {
        let doc = json!({ "defs": [{ "params": { "name": "a" } }, { "params": { "name": "b" } }] });
        let out = run_jaq(".defs[]", &doc).unwrap();
        assert_eq!(out, vec![json!({ "params": { "name": "a" } }), json!({ "params": { "name": "b" } })]);
    }

    #[test]
    fn bad_filters_are_reported() {
        let doc = json!({});
        assert!(matches!(run_jaq(".[", &doc), Err(ModelError::Jq(_))));
        assert!(matches!(run_jaq("no_such_fn(1)", &doc), Err(ModelError::Jq(_))));
    }
}
