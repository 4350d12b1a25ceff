//! Recipe lookup and option resolution shared by the commands.

use anyhow::{bail, Result};

use crate::core::options::{parse_override, Options};
use crate::core::settings::{Os, Settings};
use crate::recipes::{Recipe, RecipeRegistry};
use crate::util::hash::Fingerprint;

/// Look up a recipe by name.
pub fn lookup_recipe<'r>(registry: &'r RecipeRegistry, name: &str) -> Result<&'r dyn Recipe> {
    match registry.get(name) {
        Some(recipe) => Ok(recipe),
        None => bail!(
            "unknown recipe `{}`\n\
             available recipes: {}",
            name,
            registry.names().collect::<Vec<_>>().join(", ")
        ),
    }
}

/// Resolve a recipe's options for `os` from raw `name=value` overrides.
pub fn resolve_options(recipe: &dyn Recipe, os: Os, overrides: &[String]) -> Result<Options> {
    let pairs = overrides
        .iter()
        .map(|raw| parse_override(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let schema = recipe.schema(os);
    let options = schema.resolve(pairs.iter().map(|(n, v)| (n.as_str(), v.as_str())))?;
    Ok(options)
}

/// Identify a binary package by everything that affects its contents.
pub fn package_id(name: &str, version: &str, settings: &Settings, options: &Options) -> String {
    let mut fp = Fingerprint::new();
    fp.update_pair("name", name)
        .update_pair("version", version)
        .update_pair("os", settings.os.as_str())
        .update_pair("arch", settings.arch.as_str())
        .update_pair("compiler", settings.compiler.as_str())
        .update_pair("build_type", settings.build_type.as_str());
    for (option, value) in options.iter() {
        fp.update_pair(option, &value.to_string());
    }
    fp.finish_short()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::OptionError;

    #[test]
    fn test_lookup_unknown_recipe() {
        let registry = RecipeRegistry::new();
        let err = lookup_recipe(&registry, "boost").err().unwrap();
        let msg = err.to_string();
        assert!(msg.contains("unknown recipe `boost`"));
        assert!(msg.contains("opencv, phantom, vtk"));
    }

    #[test]
    fn test_resolve_options_from_overrides() {
        let registry = RecipeRegistry::new();
        let recipe = lookup_recipe(&registry, "vtk").unwrap();
        let options = resolve_options(
            recipe,
            Os::Linux,
            &["qt_version=5".to_string(), "shared=False".to_string()],
        )
        .unwrap();
        assert_eq!(options.get_str("qt_version").unwrap(), "5");
        assert!(!options.get_bool("shared").unwrap());
    }

    #[test]
    fn test_resolve_options_errors_are_typed() {
        let registry = RecipeRegistry::new();
        let recipe = lookup_recipe(&registry, "opencv").unwrap();

        let err = resolve_options(recipe, Os::Windows, &["with_gtk=True".to_string()]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OptionError>(),
            Some(OptionError::Unknown { .. })
        ));

        let err = resolve_options(recipe, Os::Linux, &["with_cuda".to_string()]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OptionError>(),
            Some(OptionError::Malformed { .. })
        ));
    }

    #[test]
    fn test_package_id_depends_on_options_and_settings() {
        let registry = RecipeRegistry::new();
        let recipe = lookup_recipe(&registry, "vtk").unwrap();
        let linux = Settings::for_os(Os::Linux);

        let defaults = resolve_options(recipe, Os::Linux, &[]).unwrap();
        let static_libs = resolve_options(recipe, Os::Linux, &["shared=False".to_string()]).unwrap();

        let a = package_id("vtk", "9.3.1", &linux, &defaults);
        let b = package_id("vtk", "9.3.1", &linux, &defaults);
        let c = package_id("vtk", "9.3.1", &linux, &static_libs);
        let d = package_id("vtk", "9.3.1", &Settings::for_os(Os::Windows), &defaults);

        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }
}
