use crate::adapters::source::{FileSource, InputSource, MemorySource, StreamSource};
use crate::config::settings::RunSettings;
use crate::config::toml_config::TomlConfig;
use crate::config::CliConfig;
use crate::domain::model::{ConflictPolicy, FieldPath, InputMode, MalformedPolicy, OutputFormat};
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};

impl CliConfig {
    /// Command line flags over the TOML file over built-in defaults.
    pub fn resolve(&self) -> Result<RunSettings> {
        let mut settings = match &self.config {
            Some(path) => RunSettings::from_toml(&TomlConfig::from_file(path)?)?,
            None => RunSettings::default(),
        };

        if !self.fields.is_empty() {
            settings.fields = FieldPath::parse_all(&self.fields)?;
        }
        if let Some(format) = self.extension {
            settings.format = format;
        }
        if let Some(related) = &self.related {
            settings.related = Some(related.clone());
        }
        if let Some(null_as) = self.null_as {
            settings.null_as = null_as;
        }
        if self.lines {
            settings.input_mode = InputMode::Lines;
        }
        if self.skip_malformed {
            settings.malformed = MalformedPolicy::Skip;
        }
        if self.split_arrays {
            settings.split_arrays = true;
        }
        if self.strict {
            settings.conflicts = ConflictPolicy::Fail;
        }

        Ok(settings)
    }

    /// Opens the configured input. Stdin is buffered when the format needs
    /// two passes over it.
    pub fn input_source(&self, format: OutputFormat) -> Result<InputSource> {
        match &self.infile {
            Some(path) => {
                if path.extension().and_then(|e| e.to_str()) == Some("jsonl") {
                    tracing::warn!(
                        "⚠️ {} may not be a flattened file; run `twarc2 flatten {} <OUTFILE>` first if fields come out empty",
                        path.display(),
                        path.display()
                    );
                }
                Ok(InputSource::File(FileSource::new(path.clone())))
            }
            None if format.needs_two_passes() => Ok(InputSource::Memory(MemorySource::buffer(
                std::io::stdin().lock(),
                "<stdin>",
            )?)),
            None => Ok(InputSource::Stream(StreamSource::new(
                std::io::stdin().lock(),
                "<stdin>",
            ))),
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.infile {
            validate_path("infile", &path.to_string_lossy())?;
        }
        if let Some(path) = &self.outfile {
            validate_path("outfile", &path.to_string_lossy())?;
        }
        if let Some(path) = &self.config {
            validate_path("config", &path.to_string_lossy())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::NullRendering;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_flags() {
        let cli = CliConfig::parse_from(["twarc-filter"]);
        let settings = cli.resolve().unwrap();

        assert_eq!(settings.fields, FieldPath::defaults());
        assert_eq!(settings.format, OutputFormat::Json);
    }

    #[test]
    fn test_repeated_and_comma_separated_fields() {
        let cli = CliConfig::parse_from([
            "twarc-filter",
            "-f",
            "id,text",
            "--fields",
            "referenced_tweets.type",
            "-e",
            "csv",
            "--null-as",
            "none",
        ]);
        let settings = cli.resolve().unwrap();

        let fields: Vec<String> = settings.fields.iter().map(|f| f.to_string()).collect();
        assert_eq!(fields, vec!["id", "text", "referenced_tweets.type"]);
        assert_eq!(settings.format, OutputFormat::Csv);
        assert_eq!(settings.null_as, NullRendering::NoneText);
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            b"[output]\nformat = \"csv\"\n\n[filter]\nrelated = \"quoted\"\n\n[projection]\nfields = [\"id\"]\n",
        )
        .unwrap();
        let config_path = file.path().to_string_lossy().to_string();

        let cli = CliConfig::parse_from([
            "twarc-filter",
            "--config",
            config_path.as_str(),
            "--related",
            "retweeted",
        ]);
        let settings = cli.resolve().unwrap();

        assert_eq!(settings.format, OutputFormat::Csv);
        assert_eq!(settings.related.as_deref(), Some("retweeted"));
        assert_eq!(settings.fields, FieldPath::parse_all(["id"]).unwrap());
    }

    #[test]
    fn test_invalid_field_flag() {
        let cli = CliConfig::parse_from(["twarc-filter", "-f", "referenced_tweets..type"]);

        assert!(cli.resolve().is_err());
    }

    #[test]
    fn test_file_input_is_rewindable() {
        let cli = CliConfig::parse_from(["twarc-filter", "-i", "tweets.json"]);
        let source = cli.input_source(OutputFormat::Csv).unwrap();

        assert!(matches!(source, InputSource::File(_)));
    }
}
