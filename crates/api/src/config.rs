//! Types for use when configuring bzz modules.

use crate::*;
use std::sync::Mutex;

/// Denotes a type used to configure a specific bzz module.
///
/// A module config serializes to a json object with a single top-level
/// property named after the module, e.g. `{ "netStore": { ... } }`, so
/// that configs of different modules can share one [Config] without
/// colliding.
///
/// Note, the types defined in this struct are specifically for configuration
/// that cannot be changed at runtime, the likes of which might be found
/// in a configuration file.
pub trait ModConfig:
    'static
    + Sized
    + Default
    + std::fmt::Debug
    + serde::Serialize
    + serde::de::DeserializeOwned
    + Send
    + Sync
{
}

/// Bzz configuration.
///
/// This is a json object of module configs. It can be edited after the
/// builder has been frozen into an `Arc`, which is how tests tune modules
/// before creating them.
#[derive(Debug, Default)]
pub struct Config(Mutex<serde_json::Map<String, serde_json::Value>>);

impl serde::Serialize for Config {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.lock().unwrap().serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let map = serde_json::Map::deserialize(deserializer)?;
        Ok(Self(Mutex::new(map)))
    }
}

impl Config {
    /// Set a module config.
    ///
    /// When bzz is generating a default configuration, each module factory
    /// calls this with its default config. It may also be called to
    /// override a module config before that module is created.
    /// The top-level properties of the serialized module config replace
    /// any existing properties of the same name.
    pub fn set_module_config<M: ModConfig>(&self, config: &M) -> BzzResult<()> {
        let value = serde_json::to_value(config)
            .map_err(|e| BzzError::other_src("encode module config", e))?;
        let serde_json::Value::Object(value) = value else {
            return Err(BzzError::other(format!(
                "module config must serialize to a json object: {config:?}"
            )));
        };
        self.0.lock().unwrap().extend(value);
        Ok(())
    }

    /// Extract a module config.
    ///
    /// Note that this config may be loaded from disk and edited by humans,
    /// so module configs should be tolerant to missing properties
    /// (`#[serde(default)]`), setting sane defaults. Properties belonging
    /// to other modules are ignored.
    pub fn get_module_config<M: ModConfig>(&self) -> BzzResult<M> {
        let map = self.0.lock().unwrap().clone();
        serde_json::from_value(serde_json::Value::Object(map))
            .map_err(|e| BzzError::other_src("decode module config", e))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(
        Debug, Default, PartialEq, serde::Serialize, serde::Deserialize,
    )]
    #[serde(default, rename_all = "camelCase")]
    struct Mod1Config {
        p_a: u32,
        p_b: String,
    }

    #[derive(
        Debug, Default, PartialEq, serde::Serialize, serde::Deserialize,
    )]
    #[serde(default, rename_all = "camelCase")]
    struct Mod1ModConfig {
        mod_one: Mod1Config,
    }

    impl ModConfig for Mod1ModConfig {}

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    struct Mod2Config {
        p_c: u32,
    }

    impl Default for Mod2Config {
        fn default() -> Self {
            Self { p_c: 42 }
        }
    }

    #[derive(
        Debug, Default, PartialEq, serde::Serialize, serde::Deserialize,
    )]
    #[serde(default, rename_all = "camelCase")]
    struct Mod2ModConfig {
        mod_two: Mod2Config,
    }

    impl ModConfig for Mod2ModConfig {}

    #[test]
    fn config_usage_example() {
        let config = Config::default();
        config
            .set_module_config(&Mod1ModConfig::default())
            .unwrap();
        config
            .set_module_config(&Mod2ModConfig::default())
            .unwrap();

        // output the "default" config
        assert_eq!(
            r##"{
  "modOne": {
    "pA": 0,
    "pB": ""
  },
  "modTwo": {
    "pC": 42
  }
}"##,
            serde_json::to_string_pretty(&config).unwrap()
        );

        // ensure we can load a weird config from disk
        let config: Config = serde_json::from_str(
            r#"{
          "modBAD": { "foo": "bar" },
          "modOne": { "pB": "test-p_b" },
          "modTwo": { "pC": 7, "extra": "foo" }
        }"#,
        )
        .unwrap();

        assert_eq!(
            Mod1ModConfig {
                mod_one: Mod1Config {
                    p_a: 0,
                    p_b: "test-p_b".to_string(),
                },
            },
            config.get_module_config().unwrap(),
        );

        assert_eq!(
            Mod2ModConfig {
                mod_two: Mod2Config { p_c: 7 },
            },
            config.get_module_config().unwrap(),
        );
    }

    #[test]
    fn unset_mods_get_the_default() {
        let config = Config::default();
        assert_eq!(
            Mod2ModConfig::default(),
            config.get_module_config().unwrap()
        );
    }

    #[test]
    fn set_overrides_previous_value() {
        let config = Config::default();
        config
            .set_module_config(&Mod2ModConfig::default())
            .unwrap();
        config
            .set_module_config(&Mod2ModConfig {
                mod_two: Mod2Config { p_c: 1 },
            })
            .unwrap();

        let out: Mod2ModConfig = config.get_module_config().unwrap();
        assert_eq!(1, out.mod_two.p_c);
    }

    #[test]
    fn non_object_mod_config_is_rejected() {
        #[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
        struct NotAnObject(u32);

        impl ModConfig for NotAnObject {}

        let config = Config::default();
        assert!(config.set_module_config(&NotAnObject(42)).is_err());
    }
}
