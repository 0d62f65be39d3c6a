use std::collections::HashMap;
use std::sync::LazyLock;

use colbatch_error::{DbError, Result, ResultExt};

use crate::size_tracker::{DEFAULT_MAX_BATCH_SIZE_BYTES, DEFAULT_MAX_COLUMN_SIZE_BYTES};

/// Byte budgets used when creating batch builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchBuilderConfig {
    pub max_batch_bytes: usize,
    pub max_column_bytes: usize,
}

impl Default for BatchBuilderConfig {
    fn default() -> Self {
        BatchBuilderConfig {
            max_batch_bytes: DEFAULT_MAX_BATCH_SIZE_BYTES,
            max_column_bytes: DEFAULT_MAX_COLUMN_SIZE_BYTES,
        }
    }
}

impl BatchBuilderConfig {
    pub fn set_from_str(&mut self, name: &str, value: &str) -> Result<()> {
        let func = get_setting(name)?;
        (func.set)(value, self)
    }

    pub fn get_as_string(&self, name: &str) -> Result<String> {
        let func = get_setting(name)?;
        Ok((func.get)(self))
    }

    /// Reset a single setting to its default value.
    pub fn reset(&mut self, name: &str) -> Result<()> {
        let def_conf = Self::default();
        let func = get_setting(name)?;

        let value = (func.get)(&def_conf);
        (func.set)(&value, self)
    }

    pub fn reset_all(&mut self) {
        *self = Self::default();
    }

    /// Names and descriptions of all settings, sorted by name.
    pub fn settings() -> Vec<(&'static str, &'static str)> {
        let mut settings: Vec<_> = GET_SET_FUNCTIONS
            .iter()
            .map(|(name, func)| (*name, func.description))
            .collect();
        settings.sort_unstable();
        settings
    }
}

fn get_setting(name: &str) -> Result<&'static SettingFunctions> {
    GET_SET_FUNCTIONS
        .get(name)
        .ok_or_else(|| DbError::new(format!("Missing setting for '{name}'")))
}

struct SettingFunctions {
    description: &'static str,
    set: fn(value: &str, conf: &mut BatchBuilderConfig) -> Result<()>,
    get: fn(conf: &BatchBuilderConfig) -> String,
}

impl SettingFunctions {
    const fn new<S: BuilderSetting>() -> Self {
        SettingFunctions {
            description: S::DESCRIPTION,
            set: S::set_from_str as _,
            get: S::get_as_string as _,
        }
    }
}

fn insert_setting<S: BuilderSetting>(map: &mut HashMap<&'static str, SettingFunctions>) {
    if map.insert(S::NAME, SettingFunctions::new::<S>()).is_some() {
        panic!("Duplicate settings names: {}", S::NAME);
    }
}

static GET_SET_FUNCTIONS: LazyLock<HashMap<&'static str, SettingFunctions>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    insert_setting::<MaxBatchBytes>(&mut map);
    insert_setting::<MaxColumnBytes>(&mut map);

    map
});

pub trait BuilderSetting: Sync + Send + 'static {
    const NAME: &'static str;
    const DESCRIPTION: &'static str;

    fn set_from_str(value: &str, conf: &mut BatchBuilderConfig) -> Result<()>;
    fn get_as_string(conf: &BatchBuilderConfig) -> String;
}

/// Parse a non-zero byte count.
fn parse_byte_count(name: &str, value: &str) -> Result<usize> {
    let val: usize = value
        .trim()
        .parse()
        .context_fn(|| format!("Invalid value '{value}' for '{name}'"))?;
    if val == 0 {
        return Err(DbError::new(format!("'{name}' cannot be zero")));
    }
    Ok(val)
}

pub struct MaxBatchBytes;

impl BuilderSetting for MaxBatchBytes {
    const NAME: &'static str = "max_batch_bytes";
    const DESCRIPTION: &'static str = "Byte budget for a single batch";

    fn set_from_str(value: &str, conf: &mut BatchBuilderConfig) -> Result<()> {
        conf.max_batch_bytes = parse_byte_count(Self::NAME, value)?;
        Ok(())
    }

    fn get_as_string(conf: &BatchBuilderConfig) -> String {
        conf.max_batch_bytes.to_string()
    }
}

pub struct MaxColumnBytes;

impl BuilderSetting for MaxColumnBytes {
    const NAME: &'static str = "max_column_bytes";
    const DESCRIPTION: &'static str = "Byte budget for a single column within a batch";

    fn set_from_str(value: &str, conf: &mut BatchBuilderConfig) -> Result<()> {
        conf.max_column_bytes = parse_byte_count(Self::NAME, value)?;
        Ok(())
    }

    fn get_as_string(conf: &BatchBuilderConfig) -> String {
        conf.max_column_bytes.to_string()
    }
}
