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

use std::collections::HashMap;

pub type PathParams = HashMap<String, String>;

/// Matches a concrete request path against a route pattern.
///
/// Pattern segments are literals, `:name` parameters (bind one segment
/// verbatim) or `*`/`**` wildcards (consume the rest of the path). The
/// `base_prefix` is stripped from the request path when it is a literal
/// prefix of it. Returns the bound parameters, or `None` when the path
/// does not match. Every outcome is a value; this never fails.
pub fn match_path(pattern: &str, request_path: &str, base_prefix: &str) -> Option<PathParams> {
    let remainder = if !base_prefix.is_empty() && request_path.starts_with(base_prefix) {
        &request_path[base_prefix.len()..]
    } else {
        request_path
    };

    let pattern_segments = split_segments(pattern);
    let path_segments = split_segments(remainder);

    let has_wildcard = pattern_segments.iter().any(|s| is_wildcard(s));

    // Length pre-check; correctness is enforced by the walk below.
    if !has_wildcard && pattern_segments.len() != path_segments.len() {
        return None;
    }

    let mut params = PathParams::new();
    let mut consumed = 0usize;

    for segment in &pattern_segments {
        if is_wildcard(segment) {
            // `*` and `**` both consume everything that is left.
            return Some(params);
        }

        let Some(path_segment) = path_segments.get(consumed) else {
            return None;
        };

        if let Some(name) = segment.strip_prefix(':') {
            params.insert(name.to_string(), (*path_segment).to_string());
        } else if segment != path_segment {
            return None;
        }

        consumed += 1;
    }

    if consumed != path_segments.len() {
        return None;
    }

    Some(params)
}

fn is_wildcard(segment: &str) -> bool {
    segment == "*" || segment == "**"
}

/// Splitting on `/` and dropping empty segments normalizes leading,
/// trailing and duplicated slashes in one pass.
fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_match() {
        let params = match_path("/api/users", "/api/users", "").unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn test_literal_mismatch() {
        assert!(match_path("/api/users", "/api/products", "").is_none());
    }

    #[test]
    fn test_literal_is_case_sensitive() {
        assert!(match_path("/api/Users", "/api/users", "").is_none());
    }

    #[test]
    fn test_param_binding() {
        let params = match_path("/users/:id", "/users/42", "").unwrap();
        assert_eq!(params.get("id"), Some(&"42".to_string()));
    }

    #[test]
    fn test_multiple_params() {
        let params = match_path("/users/:id/posts/:post_id", "/users/123/posts/456", "").unwrap();
        assert_eq!(params.get("id"), Some(&"123".to_string()));
        assert_eq!(params.get("post_id"), Some(&"456".to_string()));
    }

    #[test]
    fn test_param_binds_segment_verbatim() {
        let params = match_path("/users/:id", "/users/%20abc", "").unwrap();
        assert_eq!(params.get("id"), Some(&"%20abc".to_string()));
    }

    #[test]
    fn test_segment_count_must_match_without_wildcard() {
        assert!(match_path("/users/:id", "/users/42/orders", "").is_none());
        assert!(match_path("/users/:id/orders", "/users/42", "").is_none());
    }

    #[test]
    fn test_single_wildcard_consumes_rest() {
        let params = match_path("/users/*", "/users/42/orders/7", "").unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn test_double_wildcard_behaves_like_single() {
        assert!(match_path("/files/**", "/files/a/b/c", "").is_some());
        assert!(match_path("/files/*", "/files/a/b/c", "").is_some());
    }

    #[test]
    fn test_params_before_wildcard_are_bound() {
        let params = match_path("/users/:id/*", "/users/9/orders/1", "").unwrap();
        assert_eq!(params.get("id"), Some(&"9".to_string()));
    }

    #[test]
    fn test_base_prefix_is_stripped() {
        let params = match_path("/users/:id", "/api/users/7", "/api").unwrap();
        assert_eq!(params.get("id"), Some(&"7".to_string()));
    }

    #[test]
    fn test_non_matching_prefix_is_ignored() {
        // When the prefix is not a literal prefix the path is used as-is.
        assert!(match_path("/v2/users", "/v2/users", "/api").is_some());
    }

    #[test]
    fn test_trailing_and_duplicate_slashes() {
        assert!(match_path("/api/users", "/api/users/", "").is_some());
        assert!(match_path("/api/users", "//api///users", "").is_some());
    }

    #[test]
    fn test_root_pattern() {
        assert!(match_path("/", "/", "").is_some());
        assert!(match_path("/", "/extra", "").is_none());
    }

    #[test]
    fn test_path_exhausted_before_pattern() {
        assert!(match_path("/a/:b/c", "/a/x", "").is_none());
    }
}
