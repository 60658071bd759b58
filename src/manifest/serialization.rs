//! Serialization implementations for the manifest model
//!
//! Hand-written serde impls cover the parts of the document grammar that
//! derives cannot express: the open manifest mapping (unknown top-level
//! keys become custom actions or custom data, never errors), the
//! single-key mixin and required-extension declarations, actions and steps
//! that tolerate null document nodes, and credentials that are always
//! required once loaded.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::Value;

use crate::manifest::{
    Action, CredentialDefinition, Location, Manifest, MappedImage, MixinDeclaration,
    RequiredExtension, Step,
};

fn string_field<'de, M>(map: &mut M) -> Result<String, M::Error>
where
    M: MapAccess<'de>,
{
    Ok(map.next_value::<Option<String>>()?.unwrap_or_default())
}

fn seq_field<'de, M, T>(map: &mut M) -> Result<Vec<T>, M::Error>
where
    M: MapAccess<'de>,
    T: Deserialize<'de>,
{
    Ok(map.next_value::<Option<Vec<T>>>()?.unwrap_or_default())
}

impl<'de> Deserialize<'de> for Manifest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ManifestVisitor;

        impl<'de> Visitor<'de> for ManifestVisitor {
            type Value = Manifest;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a manifest mapping")
            }

            fn visit_map<M>(self, mut map: M) -> Result<Manifest, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut manifest = Manifest::default();
                let mut legacy_image: Option<String> = None;

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "name" => manifest.name = string_field(&mut map)?,
                        "description" => manifest.description = string_field(&mut map)?,
                        "version" => manifest.version = string_field(&mut map)?,
                        "tag" => manifest.bundle_tag = string_field(&mut map)?,
                        "image" => manifest.image = string_field(&mut map)?,
                        // Retired key from an older schema revision; old
                        // documents must keep decoding.
                        "invocationImage" => legacy_image = map.next_value()?,
                        "dockerfile" => manifest.dockerfile = string_field(&mut map)?,
                        "mixins" => manifest.mixins = seq_field(&mut map)?,
                        "install" => manifest.install = map.next_value()?,
                        "upgrade" => manifest.upgrade = map.next_value()?,
                        "uninstall" => manifest.uninstall = map.next_value()?,
                        "parameters" => manifest.parameters = seq_field(&mut map)?,
                        "credentials" => manifest.credentials = seq_field(&mut map)?,
                        "outputs" => manifest.outputs = seq_field(&mut map)?,
                        "dependencies" => manifest.dependencies = seq_field(&mut map)?,
                        "images" => {
                            manifest.images = map
                                .next_value::<Option<BTreeMap<String, MappedImage>>>()?
                                .unwrap_or_default();
                        }
                        "required" => manifest.required = seq_field(&mut map)?,
                        _ => {
                            let value: Value = map.next_value()?;
                            if value.is_null() || value.is_sequence() {
                                if let Ok(action) = serde_yaml::from_value::<Action>(value.clone())
                                {
                                    manifest.custom_actions.insert(key, action);
                                    continue;
                                }
                            }
                            manifest.custom.insert(key, value);
                        }
                    }
                }

                if manifest.image.is_empty() {
                    manifest.image = legacy_image.unwrap_or_default();
                }

                Ok(manifest)
            }
        }

        deserializer.deserialize_map(ManifestVisitor)
    }
}

impl Serialize for Manifest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;

        if !self.name.is_empty() {
            map.serialize_entry("name", &self.name)?;
        }
        if !self.description.is_empty() {
            map.serialize_entry("description", &self.description)?;
        }
        if !self.version.is_empty() {
            map.serialize_entry("version", &self.version)?;
        }
        if !self.bundle_tag.is_empty() {
            map.serialize_entry("tag", &self.bundle_tag)?;
        }
        if !self.image.is_empty() {
            map.serialize_entry("image", &self.image)?;
        }
        if !self.dockerfile.is_empty() {
            map.serialize_entry("dockerfile", &self.dockerfile)?;
        }
        if !self.mixins.is_empty() {
            map.serialize_entry("mixins", &self.mixins)?;
        }
        if !self.install.is_empty() {
            map.serialize_entry("install", &self.install)?;
        }
        if !self.upgrade.is_empty() {
            map.serialize_entry("upgrade", &self.upgrade)?;
        }
        if !self.uninstall.is_empty() {
            map.serialize_entry("uninstall", &self.uninstall)?;
        }
        for (name, action) in &self.custom_actions {
            map.serialize_entry(name, action)?;
        }
        if !self.parameters.is_empty() {
            map.serialize_entry("parameters", &self.parameters)?;
        }
        if !self.credentials.is_empty() {
            map.serialize_entry("credentials", &self.credentials)?;
        }
        if !self.outputs.is_empty() {
            map.serialize_entry("outputs", &self.outputs)?;
        }
        if !self.dependencies.is_empty() {
            map.serialize_entry("dependencies", &self.dependencies)?;
        }
        if !self.images.is_empty() {
            map.serialize_entry("images", &self.images)?;
        }
        if !self.required.is_empty() {
            map.serialize_entry("required", &self.required)?;
        }
        for (key, value) in &self.custom {
            map.serialize_entry(key, value)?;
        }

        map.end()
    }
}

impl<'de> Deserialize<'de> for MixinDeclaration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MixinVisitor;

        impl<'de> Visitor<'de> for MixinVisitor {
            type Value = MixinDeclaration;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a mixin name or a single-entry mapping of name to config")
            }

            fn visit_str<E>(self, name: &str) -> Result<MixinDeclaration, E>
            where
                E: de::Error,
            {
                Ok(MixinDeclaration::new(name))
            }

            fn visit_map<M>(self, mut map: M) -> Result<MixinDeclaration, M::Error>
            where
                M: MapAccess<'de>,
            {
                let Some((name, config)) = map.next_entry::<String, Value>()? else {
                    return Err(de::Error::custom("mixin declaration was empty"));
                };
                if map.next_entry::<String, Value>()?.is_some() {
                    return Err(de::Error::custom(
                        "mixin declaration contained more than one mixin",
                    ));
                }
                Ok(MixinDeclaration::with_config(name, config))
            }
        }

        deserializer.deserialize_any(MixinVisitor)
    }
}

impl Serialize for MixinDeclaration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match &self.config {
            None => serializer.serialize_str(&self.name),
            Some(config) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(&self.name, config)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for RequiredExtension {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ExtensionVisitor;

        impl<'de> Visitor<'de> for ExtensionVisitor {
            type Value = RequiredExtension;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an extension name or a single-entry mapping of name to config")
            }

            fn visit_str<E>(self, name: &str) -> Result<RequiredExtension, E>
            where
                E: de::Error,
            {
                Ok(RequiredExtension::new(name))
            }

            fn visit_map<M>(self, mut map: M) -> Result<RequiredExtension, M::Error>
            where
                M: MapAccess<'de>,
            {
                let Some((name, config)) =
                    map.next_entry::<String, Option<BTreeMap<String, Value>>>()?
                else {
                    return Err(de::Error::custom("required extension declaration was empty"));
                };
                if map.next_entry::<String, Value>()?.is_some() {
                    return Err(de::Error::custom(
                        "required extension declaration contained more than one extension",
                    ));
                }
                Ok(RequiredExtension { name, config })
            }
        }

        deserializer.deserialize_any(ExtensionVisitor)
    }
}

impl Serialize for RequiredExtension {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match &self.config {
            None => serializer.serialize_str(&self.name),
            Some(config) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(&self.name, config)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // A null document node is an action with no steps.
        let steps = Option::<Vec<Step>>::deserialize(deserializer)?;
        Ok(Action {
            steps: steps.unwrap_or_default(),
        })
    }
}

impl Serialize for Action {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.steps.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Step {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // A null list entry stays distinguishable from `- {}`.
        let data = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?;
        Ok(Step { data })
    }
}

impl Serialize for Step {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.data.serialize(serializer)
    }
}

#[derive(Deserialize)]
struct CredentialData {
    name: String,
    #[serde(default)]
    env: Option<String>,
    #[serde(default)]
    path: Option<String>,
}

impl<'de> Deserialize<'de> for CredentialDefinition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let data = CredentialData::deserialize(deserializer)?;
        // Credentials named by a manifest are always required.
        Ok(CredentialDefinition {
            name: data.name,
            required: true,
            destination: Location {
                env: data.env,
                path: data.path,
            },
        })
    }
}

impl Serialize for CredentialDefinition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("name", &self.name)?;
        if let Some(env) = &self.destination.env {
            map.serialize_entry("env", env)?;
        }
        if let Some(path) = &self.destination.path {
            map.serialize_entry("path", path)?;
        }
        map.end()
    }
}
