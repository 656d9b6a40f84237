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

use crate::mock::context::{ContextValue, TemplateContext};

/// Callables chained back-to-back are resolved at most this many times per
/// path segment before the walk gives up.
const MAX_CALLABLE_DEPTH: usize = 8;

/// Resolves a dotted-path expression such as `params.id` or
/// `faker.internet.email` against the context tree.
///
/// A callable reached mid-path is invoked with no arguments and traversal
/// continues on its result; a callable reached as the terminal value is
/// invoked to produce the result. Any unresolvable segment yields `None`,
/// never an error.
pub fn evaluate(expression: &str, context: &TemplateContext) -> Option<ContextValue> {
    let mut current = context.root().clone();

    for segment in expression.split('.') {
        let segment = segment.trim();
        if segment.is_empty() {
            return None;
        }

        let mut bridges = 0;
        current = loop {
            match current {
                ContextValue::Mapping(map) => break map.get(segment)?.clone(),
                ContextValue::Sequence(seq) => {
                    let index = segment.parse::<usize>().ok()?;
                    break seq.get(index)?.clone();
                }
                ContextValue::Callable(generate) => {
                    bridges += 1;
                    if bridges > MAX_CALLABLE_DEPTH {
                        return None;
                    }
                    current = generate();
                }
                _ => return None,
            }
        };
    }

    Some(match current {
        ContextValue::Callable(generate) => generate(),
        value => value,
    })
}
