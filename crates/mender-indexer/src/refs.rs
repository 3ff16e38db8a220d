//! Reference extraction over the document value tree
//!
//! The walk uses an explicit worklist instead of recursion so that deeply
//! nested input cannot exhaust the call stack.

use serde_yaml::Value;

/// Key whose string value names a reference target.
pub const REF_KEY: &str = "$ref";

enum Work<'a> {
    Visit(&'a Value),
    Emit(&'a str),
}

/// Collect every string paired with a `$ref` key anywhere under `root`,
/// in document order. A `$ref` whose value is not a string is walked like
/// any other value.
pub fn extract_refs(root: &Value) -> Vec<String> {
    let mut refs = Vec::new();
    let mut stack = vec![Work::Visit(root)];

    while let Some(work) = stack.pop() {
        let value = match work {
            Work::Emit(target) => {
                refs.push(target.to_string());
                continue;
            }
            Work::Visit(value) => value,
        };

        match value {
            Value::Mapping(mapping) => {
                // Pushed in reverse so entries pop in document order.
                let entries: Vec<(&Value, &Value)> = mapping.iter().collect();
                for (key, child) in entries.into_iter().rev() {
                    match (key.as_str(), child) {
                        (Some(REF_KEY), Value::String(target)) => stack.push(Work::Emit(target)),
                        _ => stack.push(Work::Visit(child)),
                    }
                }
            }
            Value::Sequence(items) => stack.extend(items.iter().rev().map(Work::Visit)),
            Value::Tagged(tagged) => stack.push(Work::Visit(&tagged.value)),
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
        }
    }

    refs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_refs_in_document_order() {
        let value = yaml(
            r##"
a:
  $ref: "#/components/schemas/A"
b:
  - items:
      $ref: "#/components/schemas/B"
  - oneOf:
      - $ref: "#/components/schemas/C"
c:
  $ref: "#/components/schemas/D"
"##,
        );
        assert_eq!(
            extract_refs(&value),
            vec![
                "#/components/schemas/A",
                "#/components/schemas/B",
                "#/components/schemas/C",
                "#/components/schemas/D",
            ]
        );
    }

    #[test]
    fn test_non_string_ref_is_walked() {
        let value = yaml(
            r##"
$ref:
  nested:
    $ref: "#/components/schemas/X"
"##,
        );
        assert_eq!(extract_refs(&value), vec!["#/components/schemas/X"]);
    }

    #[test]
    fn test_scalars_have_no_refs() {
        assert!(extract_refs(&yaml("just a string")).is_empty());
        assert!(extract_refs(&Value::Null).is_empty());
    }

    #[test]
    fn test_deep_nesting_does_not_overflow() {
        let mut value = yaml(r##"{$ref: "#/components/schemas/Deep"}"##);
        for _ in 0..100_000 {
            value = Value::Sequence(vec![value]);
        }
        assert_eq!(extract_refs(&value), vec!["#/components/schemas/Deep"]);
        // Dropping the nested value recurses inside serde_yaml; leak it instead.
        std::mem::forget(value);
    }
}
