use anyhow::Result;
use serde_json::Value;
use std::io::Write;
use tempfile::NamedTempFile;
use twarc_filter::adapters::FileSource;
use twarc_filter::domain::model::NullRendering;
use twarc_filter::{EtlEngine, FieldPath, FilterPipeline, OutputFormat, RunSettings};

const FLATTENED: &str = r#"{"id":"1","text":"hi","referenced_tweets":[{"type":"retweeted","author":{"username":"bob"}}]}
{"id":"2","text":"line one\nline two","author_id":"42","created_at":"2022-01-01T00:00:00.000Z","source":"Twitter Web App"}
{"id":"3","text":"two refs","referenced_tweets":[{"type":"quoted","author":{"username":"ann"}},{"type":"replied_to","author":{"username":"cy"}}]}
"#;

fn input_file(content: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(content.as_bytes())?;
    Ok(file)
}

fn run(file: &NamedTempFile, settings: RunSettings) -> Result<(String, twarc_filter::RunSummary)> {
    let format = settings.format;
    let pipeline = FilterPipeline::new(FileSource::new(file.path()), settings);
    let engine = EtlEngine::new(pipeline, format);

    let mut out = Vec::new();
    let summary = engine.run(&mut out)?;
    Ok((String::from_utf8(out)?, summary))
}

/// 預設欄位：CSV 標頭涵蓋所有紀錄出現過的欄位
#[test]
fn test_default_fields_csv_headers() -> Result<()> {
    let file = input_file(FLATTENED)?;
    let settings = RunSettings {
        format: OutputFormat::Csv,
        ..RunSettings::default()
    };

    let (csv, summary) = run(&file, settings)?;
    println!("📄 CSV output:\n{}", csv);

    let header = csv.lines().next().unwrap_or_default();
    assert_eq!(
        header,
        "author_id,created_at,id,\
         referenced_tweets.0.author.username,referenced_tweets.0.type,\
         referenced_tweets.1.author.username,referenced_tweets.1.type,\
         source,text"
    );
    assert_eq!(summary.columns.len(), 9);
    assert_eq!(summary.records_emitted, 3);

    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;
    assert_eq!(rows.len(), 3);

    // retweet: second reference columns are absent
    assert_eq!(&rows[0][2], "1");
    assert_eq!(&rows[0][3], "bob");
    assert_eq!(&rows[0][4], "retweeted");
    assert_eq!(&rows[0][5], "");

    // embedded newline survives quoting
    assert_eq!(&rows[1][8], "line one\nline two");
    assert_eq!(&rows[1][0], "42");
    assert_eq!(&rows[1][7], "Twitter Web App");

    assert_eq!(&rows[2][5], "cy");
    assert_eq!(&rows[2][6], "replied_to");

    Ok(())
}

#[test]
fn test_header_is_sorted_and_unique() -> Result<()> {
    let file = input_file(FLATTENED)?;
    let settings = RunSettings {
        format: OutputFormat::Csv,
        ..RunSettings::default()
    };

    let (_, summary) = run(&file, settings)?;
    let names: Vec<&str> = summary.columns.iter().map(|c| c.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    sorted.dedup();

    assert_eq!(names, sorted);
    Ok(())
}

#[test]
fn test_null_as_none_marks_present_nulls() -> Result<()> {
    let file = input_file(FLATTENED)?;
    let settings = RunSettings {
        fields: FieldPath::parse_all(["id", "source"])?,
        format: OutputFormat::Csv,
        null_as: NullRendering::NoneText,
        ..RunSettings::default()
    };

    let (csv, _) = run(&file, settings)?;
    assert_eq!(csv, "id,source\n1,None\n2,Twitter Web App\n3,None\n");
    Ok(())
}

#[test]
fn test_json_mode_round_trip_scenario() -> Result<()> {
    let file = input_file(
        r#"{"id":"1","text":"hi","referenced_tweets":[{"type":"retweeted","author":{"username":"bob"}}]}"#,
    )?;

    let (json, summary) = run(&file, RunSettings::default())?;
    let projected: Value = serde_json::from_str(json.trim_end())?;

    assert_eq!(summary.records_emitted, 1);
    assert_eq!(
        projected,
        serde_json::json!({
            "id": "1",
            "text": "hi",
            "author_id": null,
            "created_at": null,
            "source": null,
            "referenced_tweets": [{"type": "retweeted", "author": {"username": "bob"}}]
        })
    );
    Ok(())
}

#[test]
fn test_array_values_are_projected_element_wise() -> Result<()> {
    let file = input_file("[{\"id\":\"1\",\"lang\":\"en\"},{\"id\":\"2\"}]\n{\"id\":\"3\"}\n")?;
    let settings = RunSettings {
        fields: FieldPath::parse_all(["id"])?,
        ..RunSettings::default()
    };

    let (json, summary) = run(&file, settings)?;

    assert_eq!(summary.records_emitted, 2);
    assert_eq!(json, "[{\"id\":\"1\"},{\"id\":\"2\"}]\n{\"id\":\"3\"}\n");
    Ok(())
}
