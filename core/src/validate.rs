//! Parameter validation against an operation's rules.

use indexmap::IndexMap;

use crate::error::BitlyError;
use crate::registry::{OperationSpec, ParamRule};

/// Caller-supplied query parameters, in the order they were given.
pub type CallParams = IndexMap<String, String>;

/// Check `params` against `spec.params`.
///
/// Rules are walked in declared order, consuming matched names from a working
/// copy. Whatever is left at the end is reported in one `UnexpectedParams`
/// error, in the caller's original order.
pub fn validate(spec: &OperationSpec, params: &CallParams) -> Result<(), BitlyError> {
    let operation = spec.operation.name();
    let mut remaining = params.clone();

    for rule in spec.params {
        match *rule {
            ParamRule::Required(name) => {
                if remaining.shift_remove(name).is_none() {
                    return Err(BitlyError::MissingRequiredParam {
                        param: name.to_string(),
                        operation: operation.to_string(),
                    });
                }
            }
            ParamRule::Switch(names) => {
                let mut found: Option<&str> = None;
                for &name in names {
                    if !remaining.contains_key(name) {
                        continue;
                    }
                    if let Some(first) = found {
                        return Err(BitlyError::RedundantParam {
                            first: first.to_string(),
                            second: name.to_string(),
                            operation: operation.to_string(),
                        });
                    }
                    found = Some(name);
                    remaining.shift_remove(name);
                }
                if found.is_none() {
                    return Err(BitlyError::MissingSwitchParam {
                        operation: operation.to_string(),
                        candidates: names.iter().map(|n| n.to_string()).collect(),
                    });
                }
            }
            ParamRule::Optional(name) => {
                remaining.shift_remove(name);
            }
        }
    }

    if !remaining.is_empty() {
        return Err(BitlyError::UnexpectedParams {
            operation: operation.to_string(),
            params: remaining.into_keys().collect(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Operation;

    fn params(pairs: &[(&str, &str)]) -> CallParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn missing_required_param_names_param_and_operation() {
        let err = validate(Operation::Shorten.spec(), &CallParams::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Required parameter longUrl not found for method shorten."
        );
        assert!(matches!(
            err,
            BitlyError::MissingRequiredParam { ref param, ref operation }
                if param == "longUrl" && operation == "shorten"
        ));
    }

    #[test]
    fn required_param_present_passes() {
        let p = params(&[("longUrl", "http://foo.bar/long/url.html")]);
        assert!(validate(Operation::Shorten.spec(), &p).is_ok());
    }

    #[test]
    fn switch_with_neither_candidate_fails() {
        for op in [Operation::Expand, Operation::Info, Operation::Stats] {
            let err = validate(op.spec(), &CallParams::new()).unwrap_err();
            assert!(matches!(
                err,
                BitlyError::MissingSwitchParam { ref operation, ref candidates }
                    if operation == op.name() && candidates == &["shortUrl", "hash"]
            ));
        }
    }

    #[test]
    fn switch_with_both_candidates_reports_declared_order() {
        // Caller order is irrelevant: the switch declares shortUrl first.
        let p = params(&[("hash", "ayQ9ef"), ("shortUrl", "http://bit.ly/8ZYEGc")]);
        let err = validate(Operation::Expand.spec(), &p).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Redundant parameter hash was found whereas the parameter shortUrl was already passed for method expand. Please remove one of them."
        );
        assert!(matches!(
            err,
            BitlyError::RedundantParam { ref first, ref second, .. }
                if first == "shortUrl" && second == "hash"
        ));
    }

    #[test]
    fn switch_with_one_candidate_passes() {
        assert!(validate(Operation::Expand.spec(), &params(&[("hash", "ayQ9ef")])).is_ok());
        assert!(validate(
            Operation::Stats.spec(),
            &params(&[("shortUrl", "http://bit.ly/8ZYEGc")])
        )
        .is_ok());
    }

    #[test]
    fn optional_param_is_accepted_either_way() {
        let spec = Operation::Info.spec();
        assert!(validate(spec, &params(&[("hash", "R8hVH")])).is_ok());
        assert!(validate(spec, &params(&[("hash", "R8hVH"), ("keys", "hash,htmlTitle")])).is_ok());
    }

    #[test]
    fn all_unexpected_params_are_listed_in_caller_order() {
        let p = params(&[
            ("longUrl", "http://foo.bar/long/url.html"),
            ("foo", "bar"),
            ("another", "param"),
        ]);
        let err = validate(Operation::Shorten.spec(), &p).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unexpected parameters passed to method shorten: foo, another"
        );
    }

    #[test]
    fn errors_operation_rejects_any_param() {
        let err = validate(Operation::Errors.spec(), &params(&[("hash", "x")])).unwrap_err();
        assert!(matches!(err, BitlyError::UnexpectedParams { ref params, .. } if params == &["hash"]));
        assert!(validate(Operation::Errors.spec(), &CallParams::new()).is_ok());
    }

    #[test]
    fn caller_params_are_left_untouched() {
        let p = params(&[("hash", "ayQ9ef"), ("keys", "hash")]);
        let before = p.clone();
        validate(Operation::Info.spec(), &p).unwrap();
        assert_eq!(p, before);
    }
}
