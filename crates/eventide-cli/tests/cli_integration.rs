//! End-to-end tests for the `eventide` binary

use std::fs;
use std::process::Command;

use tempfile::TempDir;

fn eventide() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_eventide"));
    command.env_remove("RUST_LOG");
    command
}

#[test]
fn test_doc_renders_cross_reference() {
    let output = eventide()
        .args([
            "doc",
            "--summary",
            "Wraps {0}.",
            "--see-also",
            "Ns.Box<T>",
            "--param-template",
            "The {0} value.",
            "--params",
            "a,b",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout,
        "/// <summary>\n/// Wraps <see cref=\"Ns.Box{T}\" />.\n/// </summary>\n\
         /// <param name=\"a\">The a value.</param>\n\
         /// <param name=\"b\">The b value.</param>\n"
    );
}

#[test]
fn test_doc_inherit() {
    let output = eventide()
        .args(["doc", "--summary", "unused", "--inherit"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "/// <inheritdoc />\n");
}

#[test]
fn test_generate_with_config_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("slider.json"),
        r#"{
            "fullName": "Contoso.Widgets",
            "types": [{
                "namespace": "Contoso.Widgets",
                "name": "Slider",
                "members": [{
                    "name": "ValueChanged",
                    "kind": "event",
                    "handler": {
                        "type": "System.Action<double>",
                        "parameters": [{ "name": "value", "type": "double" }]
                    }
                }]
            }]
        }"#,
    )
    .unwrap();
    fs::write(dir.path().join("eventide.toml"), "wrapper-prefix = \"Obs\"\n").unwrap();

    let output_file = dir.path().join("Events.g.cs");
    let lock_file = dir.path().join("eventide.lock.json");
    let status = eventide()
        .current_dir(dir.path())
        .args(["generate", "--package", "Contoso.Widgets@1.0.0", "--metadata", "*.json"])
        .args(["--target-framework", "net8.0", "--output"])
        .arg(&output_file)
        .arg("--lock-file")
        .arg(&lock_file)
        .status()
        .unwrap();
    assert!(status.success());

    let text = fs::read_to_string(&output_file).unwrap();
    assert!(text.contains("public partial class ObsSliderEvents"));
    assert!(text.contains("public global::System.IObservable<double> ValueChanged => "));
    assert!(lock_file.exists());
}

#[test]
fn test_generate_without_frameworks_fails() {
    let dir = TempDir::new().unwrap();
    let output = eventide()
        .current_dir(dir.path())
        .args(["generate", "--output", "out.cs", "--metadata", "*.json"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Neither TargetFramework nor ProjectTypeGuids"));
}
