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

use crate::config::types::FakeDataSource;
use fake::faker::address::en::{CityName, CountryName, StreetName, ZipCode};
use fake::faker::internet::en::{DomainSuffix, FreeEmail};
use fake::faker::lorem::en::{Paragraph, Sentence, Word};
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::Fake;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

/// Capability interface for the `faker` template namespace. The concrete
/// source is selected once at startup, never per call.
pub trait FakeDataProvider: Send + Sync {
    fn first_name(&self) -> String;
    fn last_name(&self) -> String;
    fn full_name(&self) -> String;
    fn email(&self) -> String;
    fn domain(&self) -> String;
    fn city(&self) -> String;
    fn street(&self) -> String;
    fn country(&self) -> String;
    fn zip_code(&self) -> String;
    fn word(&self) -> String;
    fn sentence(&self) -> String;
    fn paragraph(&self) -> String;
    fn integer(&self) -> i64;
    fn float(&self) -> f64;
}

pub fn provider_for(source: FakeDataSource) -> Arc<dyn FakeDataProvider> {
    match source {
        FakeDataSource::Library => Arc::new(LibraryFakeProvider),
        FakeDataSource::Builtin => Arc::new(BuiltinFakeProvider),
    }
}

/// Generator backed by the `fake` crate.
pub struct LibraryFakeProvider;

impl FakeDataProvider for LibraryFakeProvider {
    fn first_name(&self) -> String {
        FirstName().fake()
    }

    fn last_name(&self) -> String {
        LastName().fake()
    }

    fn full_name(&self) -> String {
        Name().fake()
    }

    fn email(&self) -> String {
        FreeEmail().fake()
    }

    fn domain(&self) -> String {
        let word: String = Word().fake();
        let suffix: String = DomainSuffix().fake();
        format!("{}.{}", word.to_lowercase(), suffix)
    }

    fn city(&self) -> String {
        CityName().fake()
    }

    fn street(&self) -> String {
        StreetName().fake()
    }

    fn country(&self) -> String {
        CountryName().fake()
    }

    fn zip_code(&self) -> String {
        ZipCode().fake()
    }

    fn word(&self) -> String {
        Word().fake()
    }

    fn sentence(&self) -> String {
        Sentence(4..9).fake()
    }

    fn paragraph(&self) -> String {
        Paragraph(2..4).fake()
    }

    fn integer(&self) -> i64 {
        (0i64..10_000).fake()
    }

    fn float(&self) -> f64 {
        (0.0f64..1.0).fake()
    }
}

pub(crate) const WORDS: &[&str] = &[
    "alpha", "bravo", "cedar", "delta", "ember", "fjord", "grove", "harbor", "indigo", "juniper",
    "krill", "lumen", "meadow", "nimbus", "opal", "prairie", "quartz", "ridge", "summit", "tundra",
];

const FIRST_NAMES: &[&str] = &[
    "Ada", "Bruno", "Clara", "Dmitri", "Elena", "Felix", "Greta", "Hugo", "Iris", "Jonas", "Kira",
    "Lucas", "Mara", "Nadia", "Oscar", "Priya", "Quentin", "Rosa", "Sven", "Tessa",
];

const LAST_NAMES: &[&str] = &[
    "Alvarez", "Becker", "Costa", "Dubois", "Eriksen", "Fontaine", "Garza", "Haldane", "Ivanov",
    "Jansen", "Keller", "Lindqvist", "Moreau", "Novak", "Okafor", "Petrov", "Quinn", "Rossi",
    "Sato", "Tanaka",
];

const CITIES: &[&str] = &[
    "Aurora", "Brighton", "Calder", "Dunmore", "Eastvale", "Fairview", "Granite Bay", "Hillcrest",
    "Iron Falls", "Juno Park",
];

const STREETS: &[&str] = &[
    "Ash Street", "Birch Avenue", "Cedar Lane", "Dogwood Drive", "Elm Court", "Fir Road",
    "Garnet Way", "Hazel Boulevard",
];

const COUNTRIES: &[&str] = &[
    "Argentina", "Belgium", "Canada", "Denmark", "Estonia", "Finland", "Germany", "Hungary",
    "Ireland", "Japan",
];

fn pick(table: &[&str]) -> String {
    table
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or_default()
        .to_string()
}

/// Fixed-table fallback generator. Less varied than the library-backed
/// provider, but entirely self-contained.
pub struct BuiltinFakeProvider;

impl FakeDataProvider for BuiltinFakeProvider {
    fn first_name(&self) -> String {
        pick(FIRST_NAMES)
    }

    fn last_name(&self) -> String {
        pick(LAST_NAMES)
    }

    fn full_name(&self) -> String {
        format!("{} {}", self.first_name(), self.last_name())
    }

    fn email(&self) -> String {
        format!(
            "{}.{}@example.com",
            self.first_name().to_lowercase(),
            self.last_name().to_lowercase()
        )
    }

    fn domain(&self) -> String {
        format!("{}.example.com", pick(WORDS))
    }

    fn city(&self) -> String {
        pick(CITIES)
    }

    fn street(&self) -> String {
        pick(STREETS)
    }

    fn country(&self) -> String {
        pick(COUNTRIES)
    }

    fn zip_code(&self) -> String {
        let mut rng = rand::thread_rng();
        format!("{:05}", rng.gen_range(0..100_000))
    }

    fn word(&self) -> String {
        pick(WORDS)
    }

    fn sentence(&self) -> String {
        let mut rng = rand::thread_rng();
        let count = rng.gen_range(5..10);
        let words: Vec<String> = (0..count).map(|_| self.word()).collect();
        let mut sentence = words.join(" ");
        if let Some(first) = sentence.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        sentence.push('.');
        sentence
    }

    fn paragraph(&self) -> String {
        (0..3).map(|_| self.sentence()).collect::<Vec<_>>().join(" ")
    }

    fn integer(&self) -> i64 {
        rand::thread_rng().gen_range(0..10_000)
    }

    fn float(&self) -> f64 {
        rand::thread_rng().gen_range(0.0..1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_email_shape() {
        let provider = BuiltinFakeProvider;
        let email = provider.email();
        assert!(email.contains('@'));
        assert!(email.ends_with("example.com"));
    }

    #[test]
    fn test_builtin_zip_code_is_five_digits() {
        let provider = BuiltinFakeProvider;
        let zip = provider.zip_code();
        assert_eq!(zip.len(), 5);
        assert!(zip.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_builtin_sentence_is_capitalized_and_terminated() {
        let provider = BuiltinFakeProvider;
        let sentence = provider.sentence();
        assert!(sentence.chars().next().unwrap().is_ascii_uppercase());
        assert!(sentence.ends_with('.'));
    }

    #[test]
    fn test_builtin_integer_range() {
        let provider = BuiltinFakeProvider;
        for _ in 0..100 {
            let n = provider.integer();
            assert!((0..10_000).contains(&n));
        }
    }

    #[test]
    fn test_library_provider_returns_non_empty_values() {
        let provider = LibraryFakeProvider;
        assert!(!provider.full_name().is_empty());
        assert!(provider.email().contains('@'));
        assert!(provider.domain().contains('.'));
        assert!(!provider.sentence().is_empty());
    }

    #[test]
    fn test_provider_selection() {
        let library = provider_for(FakeDataSource::Library);
        let builtin = provider_for(FakeDataSource::Builtin);
        assert!(!library.word().is_empty());
        assert!(!builtin.word().is_empty());
    }
}
