//! Built-in recipes and the registry that looks them up by name.
//!
//! Construction never fails and does no I/O; a recipe's source table is
//! only read when the recipe is actually used.

pub mod opencv;
pub mod phantom;
pub mod recipe;
pub mod vtk;

use std::collections::BTreeMap;

pub use opencv::OpenCv;
pub use phantom::Phantom;
pub use recipe::{PackageType, Recipe, RecipeContext, RecipeMetadata};
pub use vtk::Vtk;

/// Registry of known recipes, keyed by package name.
pub struct RecipeRegistry {
    recipes: BTreeMap<&'static str, Box<dyn Recipe>>,
}

impl RecipeRegistry {
    /// Create a registry with every built-in recipe.
    pub fn new() -> Self {
        let mut registry = RecipeRegistry {
            recipes: BTreeMap::new(),
        };

        registry.register(Box::new(OpenCv));
        registry.register(Box::new(Vtk));
        registry.register(Box::new(Phantom));

        registry
    }

    /// Register a recipe, replacing any recipe of the same name.
    pub fn register(&mut self, recipe: Box<dyn Recipe>) {
        let name = recipe.metadata().name;
        self.recipes.insert(name, recipe);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Recipe> {
        self.recipes.get(name).map(|r| r.as_ref())
    }

    /// Recipe names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.recipes.keys().copied()
    }

    /// All recipes, sorted by name.
    pub fn all(&self) -> impl Iterator<Item = &dyn Recipe> + '_ {
        self.recipes.values().map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.recipes.contains_key(name)
    }
}

impl Default for RecipeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Assert that every boolean option of `recipe` renders through each of its
/// flag rows, for both values, on every OS it exists on.
#[cfg(test)]
pub(crate) fn assert_bool_options_translate(recipe: &dyn Recipe) {
    use crate::core::options::OptionDomain;
    use crate::core::settings::{Os, Settings};
    use crate::core::translate::VarSource;
    use std::collections::BTreeSet;

    let mut checked = BTreeSet::new();
    for os in [Os::Linux, Os::Windows, Os::Macos] {
        let schema = recipe.schema(os);
        let settings = Settings::for_os(os);
        for decl in schema.iter() {
            if !matches!(decl.domain, OptionDomain::Bool) {
                continue;
            }
            for (raw, value) in [("True", true), ("False", false)] {
                let options = schema.resolve([(decl.name, raw)]).unwrap();
                let vars = recipe.configuration(&options, &settings).unwrap();
                for mapping in recipe.var_mappings() {
                    let VarSource::Flag { option, toggle, inverted } = mapping.source else {
                        continue;
                    };
                    if option != decl.name || !mapping.platforms.includes(os) {
                        continue;
                    }
                    assert_eq!(
                        vars.get(mapping.variable),
                        Some(toggle.render(value != inverted)),
                        "{} = {} on {}",
                        decl.name,
                        raw,
                        os
                    );
                    checked.insert(decl.name);
                }
            }
        }
    }

    for spec in recipe.option_specs() {
        if matches!(spec.domain, OptionDomain::Bool) {
            assert!(checked.contains(spec.name), "{} has no flag row", spec.name);
        }
    }
}
