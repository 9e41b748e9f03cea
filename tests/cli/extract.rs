use anyhow::Result;
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

fn setup(test: &CliTest) -> Result<()> {
    test.write_file(
        "config/strings.yml",
        "# Shown on the home page\n\
         greeting: Hello there\n\
         id: home_page\n\
         enabled: true\n\
         jobs:\n  - Write the docs\n  - Ship the release\n",
    )?;
    test.write_file("de-DE/config/strings.yml", "greeting: Hallo zusammen\n")?;
    test.write_file("config/readme.txt", "not a resource file\n")
}

#[test]
fn test_extract_listing() -> Result<()> {
    let test = CliTest::with_config(r#"{ "locales": ["de-DE"] }"#)?;
    setup(&test)?;

    let output = test.extract_command().output()?;
    let out = stdout(&output);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert!(out.starts_with("config/strings.yml\n"), "got:\n{}", out);
    assert!(out.contains("  # Shown on the home page\n"));
    assert!(out.contains(".greeting = \"Hello there\"\n"));
    assert!(out.contains(".jobs.0 = \"Write the docs\"\n"));
    assert!(out.contains(".jobs.1 = \"Ship the release\"\n"));
    assert!(!out.contains("home_page"));
    assert!(!out.contains("de-DE"));
    assert!(out.contains("Extracted 3 strings from 1 file"));

    Ok(())
}

#[test]
fn test_extract_json() -> Result<()> {
    let test = CliTest::with_config(r#"{ "locales": ["de-DE"] }"#)?;
    setup(&test)?;

    let output = test.extract_command().arg("--json").output()?;
    assert!(output.status.success());

    let units: Vec<Value> = stdout(&output)
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()?;
    assert_eq!(units.len(), 3);
    assert_eq!(units[0]["source"], "Hello there");
    assert_eq!(units[0]["sourceLocale"], "en-US");
    assert_eq!(units[0]["comment"], "Shown on the home page");
    assert_eq!(units[0]["path"], "config/strings.yml");
    assert!(units[0]["key"].as_str().unwrap_or_default().starts_with('r'));

    Ok(())
}

#[test]
fn test_extract_given_paths() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("a/one.yml", "title: First page title\n")?;
    test.write_file("b/two.yml", "title: Second page title\n")?;

    let output = test.extract_command().arg("b").output()?;
    let out = stdout(&output);
    assert!(out.contains("b/two.yml"));
    assert!(!out.contains("a/one.yml"));

    Ok(())
}

#[test]
fn test_extract_excluded_keys_from_schema() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "test3.yml",
        "title: good words here\ndo_not_read_me: bad words here\n",
    )?;
    test.write_file(
        "test3-schema.json",
        r#"{ "excludedKeys": ["do_not_read_me"] }"#,
    )?;

    let output = test.extract_command().output()?;
    let out = stdout(&output);
    assert!(out.contains("good words here"));
    assert!(!out.contains("bad words here"));

    Ok(())
}

#[test]
fn test_extract_reports_parse_failures() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("good.yml", "title: Fine words here\n")?;
    test.write_file("bad.yml", "title: \"unterminated\n")?;

    let output = test.extract_command().output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Fine words here"));
    assert!(stderr(&output).contains("1 file(s) could not be processed"));

    let output = test.extract_command().arg("-v").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr(&output).contains("error: bad.yml: Failed to parse file: bad.yml"),
        "stderr: {}",
        stderr(&output)
    );

    Ok(())
}

#[test]
fn test_extract_invalid_config() -> Result<()> {
    let test = CliTest::with_config(r#"{ "ignores": ["[invalid"] }"#)?;

    let output = test.extract_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("ignores"));

    Ok(())
}
