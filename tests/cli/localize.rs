use anyhow::Result;
use insta::assert_snapshot;

use crate::{CliTest, stderr, stdout};

const STRINGS: &str = "greeting: Hello there\nfarewell: See you later\nenabled: true\n";

/// Writes a translation list covering the `greeting` key of the project.
fn write_translations(test: &CliTest, target: &str) -> Result<()> {
    let keys = test.extracted_keys()?;
    let greeting = keys
        .iter()
        .find(|key| key.ends_with(".greeting"))
        .cloned()
        .unwrap_or_default();
    test.write_file(
        "translations.json",
        &serde_json::json!([
            { "key": greeting, "target": target, "targetLocale": "de-DE" },
            { "key": greeting, "target": "Bonjour", "targetLocale": "fr-FR" }
        ])
        .to_string(),
    )
}

#[test]
fn test_localize_dry_run() -> Result<()> {
    let test = CliTest::with_config(r#"{ "locales": ["de-DE"] }"#)?;
    test.write_file("strings.yml", STRINGS)?;
    write_translations(&test, "Hallo zusammen")?;

    let output = test
        .localize_command()
        .args(["--translations", "translations.json"])
        .output()?;
    let out = stdout(&output);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(out.contains("strings.yml -> de-DE/strings.yml [de-DE] 1/2 translated"));
    assert!(out.contains("Would write 1 file. Run with --apply to write them."));
    assert!(!test.root().join("de-DE/strings.yml").exists());

    Ok(())
}

#[test]
fn test_localize_apply() -> Result<()> {
    let test = CliTest::with_config(r#"{ "locales": ["de-DE"] }"#)?;
    test.write_file("strings.yml", STRINGS)?;
    write_translations(&test, "Hallo zusammen")?;

    let output = test
        .localize_command()
        .args(["--translations", "translations.json", "--apply"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Wrote 1 file"));

    assert_snapshot!(test.read_file("de-DE/strings.yml")?, @r"
    enabled: true
    farewell: See you later
    greeting: Hallo zusammen
    ");

    // The localized copy is not a source file.
    assert_eq!(test.extracted_keys()?.len(), 2);

    Ok(())
}

#[test]
fn test_localize_locale_option() -> Result<()> {
    let test = CliTest::with_config(r#"{ "locales": ["de-DE"] }"#)?;
    test.write_file("strings.yml", STRINGS)?;
    write_translations(&test, "Hallo zusammen")?;

    let output = test
        .localize_command()
        .args(["--translations", "translations.json", "--apply"])
        .args(["--locale", "fr-FR", "--output-dir", "out"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let content = test.read_file("out/fr-FR/strings.yml")?;
    assert!(content.contains("greeting: Bonjour\n"));
    assert!(!test.root().join("out/de-DE/strings.yml").exists());

    Ok(())
}

#[test]
fn test_localize_with_mapping() -> Result<()> {
    let test = CliTest::with_config(
        r#"{
            "locales": ["de-DE"],
            "yaml": { "mappings": {
                "**/strings.yaml": { "template": "[dir]/strings.[locale].yaml" }
            } }
        }"#,
    )?;
    test.write_file("app/strings.yaml", STRINGS)?;
    write_translations(&test, "Guten Tag")?;

    let output = test
        .localize_command()
        .args(["--translations", "translations.json", "--apply"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let content = test.read_file("app/strings.de-DE.yaml")?;
    assert!(content.contains("greeting: Guten Tag\n"));

    let extracted = test.extract_command().output()?;
    assert!(!stdout(&extracted).contains("strings.de-DE.yaml"));

    Ok(())
}

#[test]
fn test_localize_without_locales() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("strings.yml", STRINGS)?;
    test.write_file("translations.json", "[]")?;

    let output = test
        .localize_command()
        .args(["--translations", "translations.json"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("No target locales"));

    Ok(())
}

#[test]
fn test_localize_missing_translation_file() -> Result<()> {
    let test = CliTest::with_config(r#"{ "locales": ["de-DE"] }"#)?;

    let output = test
        .localize_command()
        .args(["--translations", "missing.json"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Failed to read translation file"));

    Ok(())
}
