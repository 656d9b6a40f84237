/*
 * Copyright 2026 Mocknest Team
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use crate::mock::context::TemplateContext;
use crate::mock::evaluator;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use tracing::warn;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^{}]*)\}\}").expect("placeholder regex must compile"));

/// Walks a JSON-like template tree and substitutes every `{{expression}}`
/// occurrence in string leaves. Non-string structure is preserved; the
/// input is never mutated. Array order and object key order survive the
/// walk (`serde_json` runs with `preserve_order`).
pub fn render(template: &Value, context: &TemplateContext) -> Value {
    match template {
        Value::String(s) => Value::String(render_str(s, context)),
        Value::Array(items) => Value::Array(items.iter().map(|v| render(v, context)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (render_str(key, context), render(value, context)))
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}

/// Substitutes placeholders in a single string. An expression that does
/// not resolve leaves its `{{...}}` text untouched.
pub fn render_str(input: &str, context: &TemplateContext) -> String {
    PLACEHOLDER
        .replace_all(input, |caps: &Captures| {
            let expression = caps[1].trim();
            match evaluator::evaluate(expression, context) {
                Some(value) => value.render_string(),
                None => {
                    warn!(expression, "unresolved template expression");
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::faker::BuiltinFakeProvider;
    use crate::mock::matcher::PathParams;
    use assert_json_diff::assert_json_eq;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn test_context() -> TemplateContext {
        let mut params = PathParams::new();
        params.insert("id".to_string(), "7".to_string());
        params.insert("name".to_string(), "widget".to_string());
        let body = json!({"qty": 3});
        TemplateContext::new(&params, Some(&body), &HashMap::new(), Arc::new(BuiltinFakeProvider))
    }

    #[test]
    fn test_substitutes_params() {
        let ctx = test_context();
        assert_eq!(render_str("id: {{params.id}}", &ctx), "id: 7");
    }

    #[test]
    fn test_multiple_placeholders_in_one_string() {
        let ctx = test_context();
        assert_eq!(
            render_str("{{params.name}}-{{params.id}}", &ctx),
            "widget-7"
        );
    }

    #[test]
    fn test_inner_whitespace_is_trimmed() {
        let ctx = test_context();
        assert_eq!(render_str("{{ params.id }}", &ctx), "7");
    }

    #[test]
    fn test_unresolved_placeholder_left_intact() {
        let ctx = test_context();
        assert_eq!(
            render_str("id: {{nope.nope}}", &ctx),
            "id: {{nope.nope}}"
        );
    }

    #[test]
    fn test_non_string_scalars_unchanged() {
        let ctx = test_context();
        assert_eq!(render(&json!(42), &ctx), json!(42));
        assert_eq!(render(&json!(true), &ctx), json!(true));
        assert_eq!(render(&json!(null), &ctx), json!(null));
    }

    #[test]
    fn test_idempotent_on_non_templated_tree() {
        let ctx = test_context();
        let tree = json!({
            "a": [1, "two", {"three": 3.5}],
            "b": {"nested": null}
        });
        assert_json_eq!(render(&tree, &ctx), tree);
    }

    #[test]
    fn test_renders_nested_structures() {
        let ctx = test_context();
        let tree = json!({
            "id": "{{params.id}}",
            "items": ["{{params.name}}", {"qty": "{{body.qty}}"}]
        });
        assert_json_eq!(
            render(&tree, &ctx),
            json!({
                "id": "7",
                "items": ["widget", {"qty": "3"}]
            })
        );
    }

    #[test]
    fn test_object_keys_are_rendered() {
        let ctx = test_context();
        let tree = json!({"X-{{params.name}}": "on"});
        assert_json_eq!(render(&tree, &ctx), json!({"X-widget": "on"}));
    }

    #[test]
    fn test_input_tree_is_not_mutated() {
        let ctx = test_context();
        let tree = json!({"id": "{{params.id}}"});
        let before = tree.clone();
        let _ = render(&tree, &ctx);
        assert_eq!(tree, before);
    }

    #[test]
    fn test_array_order_preserved() {
        let ctx = test_context();
        let tree = json!(["{{params.id}}", "literal", "{{params.name}}"]);
        assert_json_eq!(render(&tree, &ctx), json!(["7", "literal", "widget"]));
    }
}
