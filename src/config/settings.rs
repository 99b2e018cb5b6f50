use crate::config::toml_config::TomlConfig;
use crate::core::projector::Projector;
use crate::core::ConfigProvider;
use crate::domain::model::{
    ConflictPolicy, FieldPath, InputMode, MalformedPolicy, NullRendering, OutputFormat,
};
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_requires, Validate};

/// Fully resolved options for one run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub fields: Vec<FieldPath>,
    pub format: OutputFormat,
    pub related: Option<String>,
    pub null_as: NullRendering,
    pub input_mode: InputMode,
    pub malformed: MalformedPolicy,
    pub conflicts: ConflictPolicy,
    pub split_arrays: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            fields: FieldPath::defaults(),
            format: OutputFormat::default(),
            related: None,
            null_as: NullRendering::default(),
            input_mode: InputMode::default(),
            malformed: MalformedPolicy::default(),
            conflicts: ConflictPolicy::default(),
            split_arrays: false,
        }
    }
}

impl RunSettings {
    /// Defaults overlaid with whatever the TOML file sets.
    pub fn from_toml(config: &TomlConfig) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(fields) = &config.projection.fields {
            settings.fields = FieldPath::parse_all(fields)?;
        }
        if config.projection.strict.unwrap_or(false) {
            settings.conflicts = ConflictPolicy::Fail;
        }
        if let Some(related) = &config.filter.related {
            settings.related = Some(related.clone());
        }
        if let Some(format) = config.output.format {
            settings.format = format;
        }
        if let Some(null_as) = config.output.null_as {
            settings.null_as = null_as;
        }
        if let Some(mode) = config.input.mode {
            settings.input_mode = mode;
        }
        if config.input.skip_malformed.unwrap_or(false) {
            settings.malformed = MalformedPolicy::Skip;
        }
        if let Some(split) = config.input.split_arrays {
            settings.split_arrays = split;
        }

        Ok(settings)
    }

    /// Field paths dropped in favour of dotted paths below them.
    pub fn shadowed_literals(&self) -> Vec<String> {
        Projector::new(self.fields.clone())
            .shadowed_literals()
            .iter()
            .map(|p| p.to_string())
            .collect()
    }
}

impl ConfigProvider for RunSettings {
    fn field_paths(&self) -> &[FieldPath] {
        &self.fields
    }

    fn output_format(&self) -> OutputFormat {
        self.format
    }

    fn related(&self) -> Option<&str> {
        self.related.as_deref()
    }

    fn null_rendering(&self) -> NullRendering {
        self.null_as
    }

    fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    fn malformed_policy(&self) -> MalformedPolicy {
        self.malformed
    }

    fn conflict_policy(&self) -> ConflictPolicy {
        self.conflicts
    }

    fn split_arrays(&self) -> bool {
        self.split_arrays
    }
}

impl Validate for RunSettings {
    fn validate(&self) -> Result<()> {
        if let Some(related) = &self.related {
            validate_non_empty_string("filter.related", related)?;
        }

        validate_requires(
            "input.skip_malformed",
            self.malformed == MalformedPolicy::Skip,
            "input.mode = \"lines\" (--lines)",
            self.input_mode == InputMode::Lines,
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = RunSettings::default();

        assert_eq!(settings.fields.len(), 7);
        assert_eq!(settings.output_format(), OutputFormat::Json);
        assert_eq!(settings.null_rendering(), NullRendering::Empty);
        assert!(settings.related().is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let config = TomlConfig::from_toml_str(
            r#"
[projection]
fields = ["id", "referenced_tweets.type"]
strict = true

[filter]
related = "quoted"

[output]
format = "csv"
null_as = "none"

[input]
mode = "lines"
skip_malformed = true
"#,
        )
        .unwrap();
        let settings = RunSettings::from_toml(&config).unwrap();

        assert_eq!(settings.fields.len(), 2);
        assert_eq!(settings.format, OutputFormat::Csv);
        assert_eq!(settings.null_as, NullRendering::NoneText);
        assert_eq!(settings.related(), Some("quoted"));
        assert_eq!(settings.conflicts, ConflictPolicy::Fail);
        assert_eq!(settings.malformed, MalformedPolicy::Skip);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_invalid_field_in_toml_is_rejected() {
        let config = TomlConfig::from_toml_str("[projection]\nfields = [\"a..b\"]\n").unwrap();

        assert!(RunSettings::from_toml(&config).is_err());
    }

    #[test]
    fn test_skip_malformed_requires_lines() {
        let settings = RunSettings {
            malformed: MalformedPolicy::Skip,
            ..RunSettings::default()
        };

        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_blank_relation_is_rejected() {
        let settings = RunSettings {
            related: Some("  ".to_string()),
            ..RunSettings::default()
        };

        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_shadowed_literals() {
        let settings = RunSettings {
            fields: FieldPath::parse_all(["author", "author.username", "id"]).unwrap(),
            ..RunSettings::default()
        };

        assert_eq!(settings.shadowed_literals(), vec!["author".to_string()]);
    }
}
