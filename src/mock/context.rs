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

use crate::mock::faker::{FakeDataProvider, WORDS};
use crate::mock::matcher::PathParams;
use chrono::{SecondsFormat, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::{Number, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub type Generator = Arc<dyn Fn() -> ContextValue + Send + Sync>;

/// Tagged-union value tree the expression evaluator walks. Callables are
/// zero-argument closures producing another `ContextValue`; they let the
/// random and faker namespaces re-evaluate on every occurrence.
#[derive(Clone)]
pub enum ContextValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<ContextValue>),
    Mapping(HashMap<String, ContextValue>),
    Callable(Generator),
}

impl fmt::Debug for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextValue::Null => write!(f, "Null"),
            ContextValue::Bool(b) => write!(f, "Bool({})", b),
            ContextValue::Number(n) => write!(f, "Number({})", n),
            ContextValue::String(s) => write!(f, "String({:?})", s),
            ContextValue::Sequence(seq) => f.debug_tuple("Sequence").field(seq).finish(),
            ContextValue::Mapping(map) => f.debug_tuple("Mapping").field(map).finish(),
            ContextValue::Callable(_) => write!(f, "Callable(..)"),
        }
    }
}

impl ContextValue {
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => ContextValue::Null,
            Value::Bool(b) => ContextValue::Bool(*b),
            Value::Number(n) => ContextValue::Number(n.clone()),
            Value::String(s) => ContextValue::String(s.clone()),
            Value::Array(items) => {
                ContextValue::Sequence(items.iter().map(ContextValue::from_json).collect())
            }
            Value::Object(map) => ContextValue::Mapping(
                map.iter()
                    .map(|(k, v)| (k.clone(), ContextValue::from_json(v)))
                    .collect(),
            ),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ContextValue::Null => Value::Null,
            ContextValue::Bool(b) => Value::Bool(*b),
            ContextValue::Number(n) => Value::Number(n.clone()),
            ContextValue::String(s) => Value::String(s.clone()),
            ContextValue::Sequence(seq) => Value::Array(seq.iter().map(|v| v.to_json()).collect()),
            ContextValue::Mapping(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            // Callables are invoked by the evaluator before this point.
            ContextValue::Callable(generate) => generate().to_json(),
        }
    }

    /// String form used when substituting into a template placeholder.
    pub fn render_string(&self) -> String {
        match self {
            ContextValue::String(s) => s.clone(),
            ContextValue::Null => "null".to_string(),
            ContextValue::Bool(b) => b.to_string(),
            ContextValue::Number(n) => n.to_string(),
            ContextValue::Sequence(_) | ContextValue::Mapping(_) => self.to_json().to_string(),
            ContextValue::Callable(generate) => generate().render_string(),
        }
    }

    fn callable<F>(generate: F) -> Self
    where
        F: Fn() -> ContextValue + Send + Sync + 'static,
    {
        ContextValue::Callable(Arc::new(generate))
    }
}

/// Per-request, read-only evaluation context. Assembled fresh for every
/// render: the date snapshot and the `random.uuid` value are captured once
/// here, while `random.int` and friends stay lazy.
pub struct TemplateContext {
    root: ContextValue,
}

impl TemplateContext {
    pub fn new(
        params: &PathParams,
        body: Option<&Value>,
        headers: &HashMap<String, String>,
        faker: Arc<dyn FakeDataProvider>,
    ) -> Self {
        let mut root = HashMap::new();

        root.insert(
            "params".to_string(),
            ContextValue::Mapping(
                params
                    .iter()
                    .map(|(k, v)| (k.clone(), ContextValue::String(v.clone())))
                    .collect(),
            ),
        );

        root.insert(
            "body".to_string(),
            body.map(ContextValue::from_json).unwrap_or(ContextValue::Null),
        );

        root.insert(
            "headers".to_string(),
            ContextValue::Mapping(
                headers
                    .iter()
                    .map(|(k, v)| (k.to_lowercase(), ContextValue::String(v.clone())))
                    .collect(),
            ),
        );

        root.insert("faker".to_string(), faker_namespace(faker));
        root.insert("date".to_string(), date_namespace());
        root.insert("random".to_string(), random_namespace());

        Self {
            root: ContextValue::Mapping(root),
        }
    }

    pub fn root(&self) -> &ContextValue {
        &self.root
    }
}

fn date_namespace() -> ContextValue {
    // Captured once per request, not re-evaluated per expression.
    let now = Utc::now();
    let mut date = HashMap::new();
    date.insert(
        "now".to_string(),
        ContextValue::String(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    date.insert(
        "timestamp".to_string(),
        ContextValue::Number(Number::from(now.timestamp_millis())),
    );
    date.insert(
        "unix".to_string(),
        ContextValue::Number(Number::from(now.timestamp())),
    );
    ContextValue::Mapping(date)
}

fn random_namespace() -> ContextValue {
    let mut random = HashMap::new();
    random.insert(
        "uuid".to_string(),
        ContextValue::String(uuid::Uuid::new_v4().to_string()),
    );
    random.insert(
        "int".to_string(),
        ContextValue::callable(|| {
            ContextValue::Number(Number::from(rand::thread_rng().gen_range(0..10_000)))
        }),
    );
    random.insert(
        "float".to_string(),
        ContextValue::callable(|| {
            let value: f64 = rand::thread_rng().gen_range(0.0..1.0);
            Number::from_f64(value)
                .map(ContextValue::Number)
                .unwrap_or(ContextValue::Null)
        }),
    );
    random.insert(
        "bool".to_string(),
        ContextValue::callable(|| ContextValue::Bool(rand::thread_rng().gen())),
    );
    random.insert(
        "choice".to_string(),
        ContextValue::callable(|| {
            let word = WORDS
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or_default();
            ContextValue::String(word.to_string())
        }),
    );
    ContextValue::Mapping(random)
}

fn faker_namespace(provider: Arc<dyn FakeDataProvider>) -> ContextValue {
    let mut faker = HashMap::new();

    let mut name = HashMap::new();
    let p = provider.clone();
    name.insert(
        "first".to_string(),
        ContextValue::callable(move || ContextValue::String(p.first_name())),
    );
    let p = provider.clone();
    name.insert(
        "last".to_string(),
        ContextValue::callable(move || ContextValue::String(p.last_name())),
    );
    let p = provider.clone();
    name.insert(
        "full".to_string(),
        ContextValue::callable(move || ContextValue::String(p.full_name())),
    );
    faker.insert("name".to_string(), ContextValue::Mapping(name));

    let mut internet = HashMap::new();
    let p = provider.clone();
    internet.insert(
        "email".to_string(),
        ContextValue::callable(move || ContextValue::String(p.email())),
    );
    let p = provider.clone();
    internet.insert(
        "domain".to_string(),
        ContextValue::callable(move || ContextValue::String(p.domain())),
    );
    faker.insert("internet".to_string(), ContextValue::Mapping(internet));

    let mut address = HashMap::new();
    let p = provider.clone();
    address.insert(
        "city".to_string(),
        ContextValue::callable(move || ContextValue::String(p.city())),
    );
    let p = provider.clone();
    address.insert(
        "street".to_string(),
        ContextValue::callable(move || ContextValue::String(p.street())),
    );
    let p = provider.clone();
    address.insert(
        "country".to_string(),
        ContextValue::callable(move || ContextValue::String(p.country())),
    );
    let p = provider.clone();
    address.insert(
        "zip".to_string(),
        ContextValue::callable(move || ContextValue::String(p.zip_code())),
    );
    faker.insert("address".to_string(), ContextValue::Mapping(address));

    let mut lorem = HashMap::new();
    let p = provider.clone();
    lorem.insert(
        "word".to_string(),
        ContextValue::callable(move || ContextValue::String(p.word())),
    );
    let p = provider.clone();
    lorem.insert(
        "sentence".to_string(),
        ContextValue::callable(move || ContextValue::String(p.sentence())),
    );
    let p = provider.clone();
    lorem.insert(
        "paragraph".to_string(),
        ContextValue::callable(move || ContextValue::String(p.paragraph())),
    );
    faker.insert("lorem".to_string(), ContextValue::Mapping(lorem));

    let mut number = HashMap::new();
    let p = provider.clone();
    number.insert(
        "int".to_string(),
        ContextValue::callable(move || ContextValue::Number(Number::from(p.integer()))),
    );
    let p = provider;
    number.insert(
        "float".to_string(),
        ContextValue::callable(move || {
            Number::from_f64(p.float())
                .map(ContextValue::Number)
                .unwrap_or(ContextValue::Null)
        }),
    );
    faker.insert("number".to_string(), ContextValue::Mapping(number));

    ContextValue::Mapping(faker)
}
