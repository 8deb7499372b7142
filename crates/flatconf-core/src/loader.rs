//! Document loading
//!
//! Reads the three document sources of an input directory, in this order:
//!
//! 1. the optional bootstrap document (`bootstrap.yml`)
//! 2. the required default document (`application.yml`)
//! 3. every profile document (`application-<profile>.yml`), sorted by path
//!
//! Bootstrap and default may hold several `---` separated documents; each is
//! tagged with the profile named by its own `spring.profiles` key. Profile
//! documents hold one document and take their profile from the file name.

use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::config::Conventions;
use crate::error::{Error, Result};
use crate::flatten::flatten;
use crate::property::{Profile, ProfiledProperties, PropertySet};
use crate::value::Value;

/// Loads and flattens the documents of an input directory
#[derive(Debug, Clone)]
pub struct Loader {
    conventions: Conventions,
    profile_file: Regex,
}

impl Loader {
    /// Create a loader for the given naming conventions
    pub fn new(conventions: Conventions) -> Result<Self> {
        let profile_file = Regex::new(&conventions.profile_file_regex()).map_err(|e| {
            Error::invalid_conventions(format!("Invalid profile file pattern: {}", e))
        })?;
        Ok(Self {
            conventions,
            profile_file,
        })
    }

    /// Load every fragment of `input_dir`: bootstrap, then default, then profiles
    pub fn load_all(&self, input_dir: &Path) -> Result<Vec<ProfiledProperties>> {
        let mut fragments = self.load_bootstrap(input_dir)?;
        fragments.extend(self.load_default(input_dir)?);
        fragments.extend(self.load_profiled(input_dir)?);
        log::info!(
            "Loaded {} fragment(s) from {}",
            fragments.len(),
            input_dir.display()
        );
        Ok(fragments)
    }

    /// Load the bootstrap document; a missing file contributes nothing
    pub fn load_bootstrap(&self, input_dir: &Path) -> Result<Vec<ProfiledProperties>> {
        let path = input_dir.join(&self.conventions.bootstrap_file);
        if !path.exists() {
            log::debug!("No bootstrap document at {}", path.display());
            return Ok(Vec::new());
        }
        self.load_multi_document(&path)
    }

    /// Load the default document, which must exist
    pub fn load_default(&self, input_dir: &Path) -> Result<Vec<ProfiledProperties>> {
        let path = input_dir.join(&self.conventions.default_file);
        if !path.exists() {
            return Err(Error::missing_default_document(&path));
        }
        self.load_multi_document(&path)
    }

    /// Load every profile document in `input_dir`
    pub fn load_profiled(&self, input_dir: &Path) -> Result<Vec<ProfiledProperties>> {
        let mut fragments = Vec::new();
        for path in self.discover_profile_documents(input_dir)? {
            fragments.push(self.load_profile_document(&path)?);
        }
        Ok(fragments)
    }

    fn discover_profile_documents(&self, input_dir: &Path) -> Result<Vec<PathBuf>> {
        let pattern = self.conventions.profile_glob(input_dir);
        let entries = glob::glob(&pattern).map_err(|e| {
            Error::invalid_conventions(format!("Invalid glob pattern '{}': {}", pattern, e))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| Error::io(e.path(), e.error()))?;
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Profile named by a profile document's file name
    pub fn profile_from_file_name(&self, path: &Path) -> Result<Profile> {
        let invalid = || {
            Error::invalid_profile_filename(path, self.conventions.profile_file_template())
        };
        let file_name = path.file_name().and_then(|n| n.to_str()).ok_or_else(invalid)?;
        let captures = self.profile_file.captures(file_name).ok_or_else(invalid)?;
        Ok(Profile::named(&captures[1]))
    }

    fn load_profile_document(&self, path: &Path) -> Result<ProfiledProperties> {
        let profile = self.profile_from_file_name(path)?;
        let content = read_document(path)?;
        let raw: serde_yaml::Value =
            serde_yaml::from_str(&content).map_err(|e| Error::parse(e.to_string()).in_file(path))?;
        let properties = if raw.is_null() {
            PropertySet::new()
        } else {
            document_properties(raw, path)?
        };

        log::debug!(
            "Read {} ({} properties, profile {})",
            path.display(),
            properties.len(),
            profile
        );
        Ok(ProfiledProperties::new(profile, properties))
    }

    fn load_multi_document(&self, path: &Path) -> Result<Vec<ProfiledProperties>> {
        let content = read_document(path)?;

        let mut fragments = Vec::new();
        for document in serde_yaml::Deserializer::from_str(&content) {
            let raw = serde_yaml::Value::deserialize(document)
                .map_err(|e| Error::parse(e.to_string()).in_file(path))?;
            // Empty and comments-only documents parse as null
            if raw.is_null() {
                continue;
            }
            let properties = document_properties(raw, path)?;
            let profile = self.profile_of(&properties);
            fragments.push(ProfiledProperties::new(profile, properties));
        }

        log::debug!(
            "Read {} ({} document(s))",
            path.display(),
            fragments.len()
        );
        Ok(fragments)
    }

    /// Profile a sub-document declares through its profile key
    ///
    /// The whole value is one profile name; `dev,prod` is not split.
    fn profile_of(&self, properties: &PropertySet) -> Profile {
        match properties.get(&self.conventions.profile_key) {
            None => Profile::Default,
            Some(value) if value.is_null() => Profile::Default,
            Some(value) => Profile::Named(value.to_string()),
        }
    }
}

/// Apply `<<` merge keys, then flatten
fn document_properties(mut raw: serde_yaml::Value, path: &Path) -> Result<PropertySet> {
    raw.apply_merge()
        .map_err(|e| Error::parse(e.to_string()).in_file(path))?;
    flatten(&Value::from_yaml(raw)).map_err(|e| e.in_file(path))
}

fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::io(path, &e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::property::PropertyValue;
    use crate::property_set;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn loader() -> Loader {
        Loader::new(Conventions::default()).unwrap()
    }

    fn write(dir: &TempDir, name: &str, content: &str) {
        std::fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_missing_default_document() {
        let dir = TempDir::new().unwrap();

        let err = loader().load_all(dir.path()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingDefaultDocument);
        assert!(err.file.unwrap().ends_with("application.yml"));
    }

    #[test]
    fn test_missing_bootstrap_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        write(&dir, "application.yml", "server:\n  port: 8080\n");

        let fragments = loader().load_all(dir.path()).unwrap();
        assert_eq!(
            fragments,
            vec![ProfiledProperties::new(
                Profile::Default,
                property_set! { "server.port" => 8080 }
            )]
        );
    }

    #[test]
    fn test_multi_document_profile_tagging() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "application.yml",
            r#"
server:
  port: 8080
---
spring:
  profiles: prod
server:
  port: 80
"#,
        );

        let fragments = loader().load_default(dir.path()).unwrap();

        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].profile, Profile::Default);
        assert_eq!(fragments[1].profile, Profile::named("prod"));
        assert_eq!(fragments[1].properties["server.port"], PropertyValue::Integer(80));
        assert_eq!(
            fragments[1].properties["spring.profiles"].as_str(),
            Some("prod")
        );
    }

    #[test]
    fn test_comma_separated_profiles_are_one_name() {
        let dir = TempDir::new().unwrap();
        write(&dir, "application.yml", "spring:\n  profiles: dev,prod\n");

        let fragments = loader().load_default(dir.path()).unwrap();
        assert_eq!(fragments[0].profile, Profile::named("dev,prod"));
    }

    #[test]
    fn test_null_profile_key_is_default() {
        let dir = TempDir::new().unwrap();
        write(&dir, "application.yml", "spring:\n  profiles: ~\na: 1\n");

        let fragments = loader().load_default(dir.path()).unwrap();
        assert_eq!(fragments[0].profile, Profile::Default);
    }

    #[test]
    fn test_load_order_bootstrap_default_profiled() {
        let dir = TempDir::new().unwrap();
        write(&dir, "bootstrap.yml", "a: 1\n");
        write(&dir, "application.yml", "a: 2\n");
        write(&dir, "application-prod.yml", "a: 4\n");
        write(&dir, "application-dev.yml", "a: 3\n");

        let fragments = loader().load_all(dir.path()).unwrap();
        let values: Vec<_> = fragments
            .iter()
            .map(|f| (f.profile.clone(), f.properties["a"].clone()))
            .collect();

        assert_eq!(
            values,
            vec![
                (Profile::Default, PropertyValue::Integer(1)),
                (Profile::Default, PropertyValue::Integer(2)),
                (Profile::named("dev"), PropertyValue::Integer(3)),
                (Profile::named("prod"), PropertyValue::Integer(4)),
            ]
        );
    }

    #[test]
    fn test_profile_comes_from_file_name_not_content() {
        let dir = TempDir::new().unwrap();
        write(&dir, "application.yml", "a: 1\n");
        write(&dir, "application-qa.yml", "spring:\n  profiles: other\n");

        let fragments = loader().load_profiled(dir.path()).unwrap();
        assert_eq!(fragments[0].profile, Profile::named("qa"));
    }

    #[test]
    fn test_non_conforming_profile_file_name() {
        let dir = TempDir::new().unwrap();
        write(&dir, "application.yml", "a: 1\n");
        write(&dir, "application-a.b.yml", "a: 2\n");

        let err = loader().load_all(dir.path()).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::InvalidProfileFilename {
                file_name: "application-a.b.yml".into()
            }
        );
    }

    #[test]
    fn test_profile_from_file_name() {
        let loader = loader();

        assert_eq!(
            loader
                .profile_from_file_name(Path::new("conf/application-prod_eu.yml"))
                .unwrap(),
            Profile::named("prod_eu")
        );
        assert!(loader
            .profile_from_file_name(Path::new("application-.yml"))
            .is_err());
        assert!(loader
            .profile_from_file_name(Path::new("application-prod.yaml"))
            .is_err());
    }

    #[test]
    fn test_other_files_are_ignored() {
        let dir = TempDir::new().unwrap();
        write(&dir, "application.yml", "a: 1\n");
        write(&dir, "application-prod.yaml", "a: 2\n");
        write(&dir, "notes.txt", "hello\n");

        let fragments = loader().load_all(dir.path()).unwrap();
        assert_eq!(fragments.len(), 1);
    }

    #[test]
    fn test_non_mapping_document_is_rejected() {
        let dir = TempDir::new().unwrap();
        write(&dir, "application.yml", "- a\n- b\n");

        let err = loader().load_all(dir.path()).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::InvalidDocumentShape {
                found: "sequence".into()
            }
        );
        assert!(err.file.unwrap().ends_with("application.yml"));
    }

    #[test]
    fn test_empty_default_document_contributes_nothing() {
        let dir = TempDir::new().unwrap();
        write(&dir, "application.yml", "");
        write(&dir, "application-prod.yml", "x: 1\n");

        let fragments = loader().load_all(dir.path()).unwrap();
        assert_eq!(
            fragments,
            vec![ProfiledProperties::new(
                Profile::named("prod"),
                property_set! { "x" => 1 }
            )]
        );
    }

    #[test]
    fn test_comments_only_documents_contribute_nothing() {
        let dir = TempDir::new().unwrap();
        write(&dir, "bootstrap.yml", "# filled in by the deploy job\n");
        write(&dir, "application.yml", "# nothing here yet\n");

        assert!(loader().load_all(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_empty_profile_document_keeps_its_profile() {
        let dir = TempDir::new().unwrap();
        write(&dir, "application.yml", "a: 1\n");
        write(&dir, "application-prod.yml", "# no overrides\n");

        let fragments = loader().load_all(dir.path()).unwrap();
        assert_eq!(
            fragments[1],
            ProfiledProperties::new(Profile::named("prod"), PropertySet::new())
        );
    }

    #[test]
    fn test_scalar_default_document_is_still_rejected() {
        let dir = TempDir::new().unwrap();
        write(&dir, "application.yml", "just text\n");

        let err = loader().load_all(dir.path()).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::InvalidDocumentShape {
                found: "string".into()
            }
        );
    }

    #[test]
    fn test_merge_keys_are_applied() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "application.yml",
            r#"
base: &b
  host: h
  port: 1
db:
  <<: *b
  port: 2
"#,
        );
        write(&dir, "application-prod.yml", "pool: &p {size: 5}\nreplica:\n  <<: *p\n");

        let fragments = loader().load_all(dir.path()).unwrap();

        assert_eq!(
            fragments[0].properties,
            property_set! { "base.host" => "h", "base.port" => 1, "db.host" => "h", "db.port" => 2 }
        );
        assert_eq!(
            fragments[1].properties,
            property_set! { "pool.size" => 5, "replica.size" => 5 }
        );
    }

    #[test]
    fn test_duplicate_keys_are_rejected() {
        let dir = TempDir::new().unwrap();
        write(&dir, "application.yml", "a: 1\na: 2\n");

        let err = loader().load_all(dir.path()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parse);
        assert!(err.file.unwrap().ends_with("application.yml"));
    }

    #[test]
    fn test_tagged_bootstrap_sub_document() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "bootstrap.yml",
            r#"
name: boot
region: eu
---
spring:
  profiles: prod
region: us
"#,
        );
        write(&dir, "application.yml", "name: app\n");
        write(&dir, "application-dev.yml", "debug: true\n");

        let fragments = loader().load_all(dir.path()).unwrap();
        let profiles: Vec<_> = fragments.iter().map(|f| f.profile.clone()).collect();
        assert_eq!(
            profiles,
            vec![
                Profile::Default,
                Profile::named("prod"),
                Profile::Default,
                Profile::named("dev"),
            ]
        );

        let merged = crate::merge::merge(&fragments);
        assert_eq!(
            merged["prod"].properties,
            property_set! {
                "name" => "app",
                "region" => "us",
                "spring.profiles" => "prod",
            }
        );
        assert_eq!(
            merged["dev"].properties,
            property_set! { "name" => "app", "region" => "eu", "debug" => true }
        );
    }

    #[test]
    fn test_malformed_yaml_names_the_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "application.yml", "a: 1\n");
        write(&dir, "application-prod.yml", "a: [unclosed\n");

        let err = loader().load_all(dir.path()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parse);
        assert!(err.file.unwrap().ends_with("application-prod.yml"));
    }
}
